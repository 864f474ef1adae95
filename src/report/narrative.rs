//! Italian narrative of the technical report
//!
//! Every function here is pure: it takes counts, flags and code lists and
//! returns paragraphs. Sentences tied to a flag are returned as `Option` and
//! simply left out when the flag is false.

use crate::entities::{
    Address, AdditionalInfo, InstallationFlags, InternalFinish, Inventory,
    SpeedRegulation, Tank, VesselRating,
};
use crate::report::blocks::{Align, Paragraph, Span};
use crate::report::classifier::{
    classify, format_psv, pressure_volume_product, DispositionTag, VesselClass,
};
use crate::report::formatter::EquipmentIndex;

const ARTS_4_5: &str = "secondo quanto disposto dal combinato degli artt. 4 e 5 del DM329/2004";
const ART_2I: &str =
    "dal campo di applicazione del D.M. 329/2004 ai sensi dell'art. 2.i del medesimo decreto";
const MISSING_PLATE_DATA: &str = "volume e pressione massima ammissibile leggibili: la \
     classificazione va completata sulla base dei dati di targa.";
const INTEGRITY_PREAMBLE: &str = "In considerazione della data di produzione e delle frequenze \
     delle verifiche di integrità previste dall'art.3 del D.lgs. 93/2000, ";

/// `count == 1` selects the singular; zero reads as plural in Italian
pub fn pluralize<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 {
        singular
    } else {
        plural
    }
}

/// "A", "A e B", "A, B e C"
pub fn format_code_list<S: AsRef<str>>(codes: &[S]) -> String {
    match codes {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [rest @ .., last] => {
            let head: Vec<&str> = rest.iter().map(AsRef::as_ref).collect();
            format!("{} e {}", head.join(", "), last.as_ref())
        }
    }
}

fn sentence() -> Paragraph {
    Paragraph::new().align(Align::Justified)
}

/// Italic family caption such as "Serbatoi di accumulo:"
fn caption(text: &str) -> Paragraph {
    Paragraph::new().push(Span::italic(text))
}

// ---------------------------------------------------------------------------
// Premise and general description
// ---------------------------------------------------------------------------

pub fn premise_opening(
    company_name: &str,
    legal: &Address,
    site: &Address,
    activity: &str,
) -> Paragraph {
    let civic = if legal.civic_number.is_empty() {
        String::new()
    } else {
        format!(", {}", legal.civic_number)
    };
    let location = if *site == Address::default() || site == legal {
        "ubicato presso la medesima sede sociale.".to_string()
    } else {
        format!("ubicato in {}, {}.", site.street_line(), site.locality_line())
    };

    sentence()
        .plain(
            "La presente relazione tecnica si riferisce all'impianto a pressione installato \
             presso il sito produttivo della ditta: ",
        )
        .push(Span::bold(company_name))
        .plain(format!(
            " con sede sociale in {} ({}), {}{}, c.a.p. {}, esercente attività di {}, ",
            legal.city, legal.province, legal.street, civic, legal.postal_code, activity
        ))
        .plain(location)
}

pub fn revision_sentence(reason: Option<&str>) -> Option<Paragraph> {
    let reason = reason.map(str::trim).filter(|r| !r.is_empty())?;
    Some(sentence().plain(format!(
        "L'attuale revisione del documento è conseguente alla {}. Vengono verificati i \
         requisiti di sicurezza nelle nuove condizioni operative, con particolare riferimento \
         alle valvole di sicurezza montate al momento della stesura di questa revisione.",
        reason
    )))
}

pub fn thickness_premise(tested: &[String]) -> Option<Paragraph> {
    if tested.is_empty() {
        return None;
    }
    Some(sentence().plain(
        "Ove previsto in base alla tipologia di apparecchiatura ed alla periodicità stabilita \
         dall'art.3 del D.lgs. 93/2000 (vedasi tabella all'ultima pagina del presente \
         documento), sono state effettuate le verifiche di integrità tramite Controllo \
         Ultrasonoro Spessimetrico, che in tutti i casi hanno fornito esito positivo.",
    ))
}

pub fn room_description(flags: &InstallationFlags) -> Paragraph {
    let mut text = String::from("L'impianto è alloggiato entro un'area");
    if flags.dedicated_room {
        text.push_str(" appositamente predisposta");
    }
    if flags.access_restricted {
        text.push_str(", accessibile solo al personale autorizzato");
    }
    text.push_str(", correttamente areata e lontana da sorgenti di calore.");
    sentence().plain(text)
}

pub fn dedicated_room_sentence(flags: &InstallationFlags) -> Option<Paragraph> {
    flags.dedicated_room.then(|| {
        sentence().plain(
            "Il locale risulta interamente dedicato alla produzione, trattamento e stoccaggio \
             dell'aria compressa e non vi è presenza, nelle vicinanze delle apparecchiature, di \
             materiale infiammabile. In considerazione del luogo di installazione si escludono \
             scenari incidentali per incendio esterno o riscaldamento incontrollato.",
        )
    })
}

pub fn intake_air_sentence(flags: &InstallationFlags) -> Paragraph {
    if flags.intake_air_clean() {
        return sentence().plain(
            "L'aria aspirata dai compressori risulta pulita e priva di sostanze in grado di \
             compromettere l'integrità delle apparecchiature.",
        );
    }
    let contaminants: Vec<&str> = flags.intake_air.iter().map(|a| a.label()).collect();
    sentence().plain(format!(
        "L'aria aspirata dai compressori può contenere {}: la manutenzione dei filtri di \
         aspirazione e gli scarichi di condensa sono pertanto eseguiti con frequenza adeguata.",
        format_code_list(&contaminants)
    ))
}

/// Speed regulation suffix for the pumping section bullet
pub fn speed_phrase(speeds: &[SpeedRegulation]) -> String {
    let variable = speeds
        .iter()
        .filter(|s| **s == SpeedRegulation::Variable)
        .count();
    let fixed = speeds.len() - variable;

    match (fixed, variable) {
        (0, 0) => String::new(),
        (_, 0) => " a giri fissi".to_string(),
        (0, _) => " a giri variabili tramite inverter".to_string(),
        (f, v) => format!(
            ", di cui n°{} a giri fissi e n°{} a giri variabili tramite inverter",
            f, v
        ),
    }
}

pub fn pumping_section(speeds: &[SpeedRegulation]) -> Paragraph {
    let count = speeds.len();
    Paragraph::new().bullet().plain(format!(
        "Sezione di pompaggio costituita da n°{} {} a vite{}",
        count,
        pluralize(count, "compressore rotativo", "compressori rotativi"),
        speed_phrase(speeds)
    ))
}

pub fn storage_section(tanks: usize) -> Paragraph {
    Paragraph::new().bullet().plain(format!(
        "Sezione di accumulo ed alimentazione delle linee aria compressa costituita da n°{} {}",
        tanks,
        pluralize(
            tanks,
            "serbatoio polmone verticale",
            "serbatoi polmone verticali"
        )
    ))
}

pub fn treatment_section(dryers: usize, filters: usize) -> Option<Paragraph> {
    if dryers == 0 {
        return None;
    }
    let filter_part = if filters > 0 {
        format!(
            " e n°{} {} di linea",
            filters,
            pluralize(filters, "filtro", "filtri")
        )
    } else {
        String::new()
    };
    Some(Paragraph::new().bullet().plain(format!(
        "Sezione trattamento aria costituita da n°{} {} a ciclo frigorifero{}",
        dryers,
        pluralize(dryers, "essiccatore d'aria", "essiccatori d'aria"),
        filter_part
    )))
}

pub fn separator_section(separators: usize) -> Option<Paragraph> {
    (separators > 0).then(|| {
        Paragraph::new()
            .bullet()
            .plain("Raccolta e trattamento delle condense tramite separatore acqua olio")
    })
}

/// One sentence per compressor feeding at least one known tank
pub fn wiring_sentences(info: &AdditionalInfo, index: &EquipmentIndex<'_>) -> Vec<Paragraph> {
    info.compressor_tanks
        .iter()
        .filter(|(compressor, _)| index.compressor(compressor).is_some())
        .filter_map(|(compressor, tanks)| {
            let resolved: Vec<&str> = tanks
                .iter()
                .map(String::as_str)
                .filter(|t| index.tank(t).is_some())
                .collect();
            if resolved.is_empty() {
                return None;
            }
            Some(
                sentence()
                    .plain("Il compressore ")
                    .italic(compressor.as_str())
                    .plain(format!(
                        " alimenta {} ",
                        pluralize(resolved.len(), "il serbatoio", "i serbatoi")
                    ))
                    .italic(format_code_list(&resolved))
                    .plain("."),
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Classification narratives
// ---------------------------------------------------------------------------

/// How the classifiable child of a unit turned out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildStatus {
    Verification,
    Declaration,
    /// Excluded, or no child vessel at all
    Excluded,
    /// Child vessel present but its volume or pressure is unknown
    InsufficientData,
}

impl ChildStatus {
    /// Status of a unit's child vessel; `None` means the unit has none
    fn of(rating: Option<&VesselRating>) -> Self {
        match rating {
            None => ChildStatus::Excluded,
            Some(r) => match (r.volume_liters, r.max_pressure_bar) {
                (Some(volume), Some(pressure)) => {
                    classify(VesselClass::SmallPressureVessel, Some(volume), Some(pressure))
                        .tag()
                        .into()
                }
                _ => ChildStatus::InsufficientData,
            },
        }
    }
}

impl From<DispositionTag> for ChildStatus {
    fn from(tag: DispositionTag) -> Self {
        match tag {
            DispositionTag::VerificationRequired => ChildStatus::Verification,
            DispositionTag::Declaration => ChildStatus::Declaration,
            DispositionTag::Excluded => ChildStatus::Excluded,
        }
    }
}

/// A parent unit and its child vessel, as seen by the narrative
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitStatus {
    pub unit_code: String,
    pub child_code: Option<String>,
    pub status: ChildStatus,
}

/// Population of a family: every unit alike, or a mix
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Population<'a> {
    Uniform(ChildStatus, &'a [UnitStatus]),
    Mixed(&'a [UnitStatus]),
}

pub fn population(units: &[UnitStatus]) -> Option<Population<'_>> {
    let first = units.first()?.status;
    if units.iter().all(|u| u.status == first) {
        Some(Population::Uniform(first, units))
    } else {
        Some(Population::Mixed(units))
    }
}

impl UnitStatus {
    fn child_or_unit(&self) -> &str {
        self.child_code.as_deref().unwrap_or(&self.unit_code)
    }
}

fn unit_codes(units: &[UnitStatus]) -> Vec<&str> {
    units.iter().map(|u| u.unit_code.as_str()).collect()
}

fn child_codes(units: &[UnitStatus]) -> Vec<&str> {
    units.iter().map(UnitStatus::child_or_unit).collect()
}

pub fn deoiler_statuses(inventory: &Inventory, index: &EquipmentIndex<'_>) -> Vec<UnitStatus> {
    inventory
        .compressors
        .iter()
        .map(|c| {
            let deoiler = index.deoiler_of(&c.plate.code);
            UnitStatus {
                unit_code: c.plate.code.clone(),
                child_code: deoiler.map(|d| d.plate.code.clone()),
                status: ChildStatus::of(deoiler.map(|d| &d.rating)),
            }
        })
        .collect()
}

pub fn exchanger_statuses(inventory: &Inventory, index: &EquipmentIndex<'_>) -> Vec<UnitStatus> {
    inventory
        .dryers
        .iter()
        .map(|d| {
            let exchanger = index.exchanger_of(&d.plate.code);
            UnitStatus {
                unit_code: d.plate.code.clone(),
                child_code: exchanger.map(|h| h.plate.code.clone()),
                status: ChildStatus::of(exchanger.map(|h| &h.rating)),
            }
        })
        .collect()
}

fn deoiler_sentence(unit: &UnitStatus) -> Paragraph {
    let base = sentence().plain("il serbatoio disoleatore a servizio del compressore, individuato alla posizione ");
    match unit.status {
        ChildStatus::Verification => base
            .italic(unit.child_or_unit())
            .plain(format!(
                ", ha volume superiore a 25 litri e pressione massima ammissibile superiore a \
                 12 bar e pertanto, {}, risulta soggetto a verifica di messa in servizio.",
                ARTS_4_5
            )),
        ChildStatus::Declaration => base
            .italic(unit.child_or_unit())
            .plain(format!(
                ", ha volume non inferiore a 25 litri e pressione massima ammissibile non \
                 superiore a 12 bar e pertanto, {}, non risulta soggetto a verifica di messa in \
                 servizio ma esclusivamente a dichiarazione di messa in servizio.",
                ARTS_4_5
            )),
        ChildStatus::Excluded => base.italic(unit.unit_code.as_str()).plain(format!(
            ", ha volume inferiore a 25 litri e pertanto è escluso {}.",
            ART_2I
        )),
        ChildStatus::InsufficientData => base
            .italic(unit.child_or_unit())
            .plain(format!(", non riporta {}", MISSING_PLATE_DATA)),
    }
}

fn deoilers_plural_sentence(status: ChildStatus, units: &[UnitStatus]) -> Paragraph {
    let base = sentence().plain("i serbatoi disoleatori a servizio dei compressori, individuati alle posizioni ");
    match status {
        ChildStatus::Verification => base
            .italic(format_code_list(&child_codes(units)))
            .plain(format!(
                ", hanno volume superiore a 25 litri e pressione massima ammissibile superiore a \
                 12 bar e pertanto, {}, risultano soggetti a verifica di messa in servizio.",
                ARTS_4_5
            )),
        ChildStatus::Declaration => base
            .italic(format_code_list(&child_codes(units)))
            .plain(format!(
                ", hanno volume non inferiore a 25 litri e pressione massima ammissibile non \
                 superiore a 12 bar e pertanto, {}, non risultano soggetti a verifica di messa \
                 in servizio ma esclusivamente a dichiarazione di messa in servizio.",
                ARTS_4_5
            )),
        ChildStatus::Excluded => base
            .italic(format_code_list(&unit_codes(units)))
            .plain(format!(
                ", hanno volume inferiore a 25 litri e pertanto sono esclusi {}.",
                ART_2I
            )),
        ChildStatus::InsufficientData => base
            .italic(format_code_list(&child_codes(units)))
            .plain(format!(", non riportano {}", MISSING_PLATE_DATA)),
    }
}

fn dryer_sentence(unit: &UnitStatus) -> Paragraph {
    let base = sentence()
        .plain("Si tratta di una apparecchiatura, individuata alla posizione ")
        .italic(unit.unit_code.as_str());
    let exchanger = unit.child_code.as_deref().unwrap_or_default();
    match unit.status {
        ChildStatus::Verification => base
            .plain(", dotata di uno scambiatore di calore in pressione, individuato alla posizione ")
            .italic(exchanger)
            .plain(format!(
                ", con volume superiore a 25 litri e pressione massima ammissibile superiore a \
                 12 bar e pertanto, {}, risulta soggetto a verifica di messa in servizio.",
                ARTS_4_5
            )),
        ChildStatus::Declaration => base
            .plain(", dotata di uno scambiatore di calore in pressione, individuato alla posizione ")
            .italic(exchanger)
            .plain(format!(
                ", con pressione massima ammissibile non superiore a 12 bar e pertanto, {}, non \
                 risulta soggetto a verifica di messa in servizio ma esclusivamente a \
                 dichiarazione di messa in servizio.",
                ARTS_4_5
            )),
        ChildStatus::Excluded => base.plain(format!(
            ", priva di recipienti di volume superiore a 25 litri e pertanto esclusa {}.",
            ART_2I
        )),
        ChildStatus::InsufficientData => base
            .plain(", dotata di uno scambiatore di calore in pressione, individuato alla posizione ")
            .italic(exchanger)
            .plain(format!(", che non riporta {}", MISSING_PLATE_DATA)),
    }
}

fn dryers_plural_sentence(status: ChildStatus, units: &[UnitStatus]) -> Paragraph {
    let base = sentence()
        .plain("Si tratta di apparecchiature, individuate alle posizioni ")
        .italic(format_code_list(&unit_codes(units)));
    match status {
        ChildStatus::Verification => base
            .plain(", dotate di scambiatori di calore in pressione, individuati alle posizioni ")
            .italic(format_code_list(&child_codes(units)))
            .plain(format!(
                ", con volume superiore a 25 litri e pressione massima ammissibile superiore a \
                 12 bar e pertanto, {}, risultano soggetti a verifica di messa in servizio.",
                ARTS_4_5
            )),
        ChildStatus::Declaration => base
            .plain(", dotate di scambiatori di calore in pressione, individuati alle posizioni ")
            .italic(format_code_list(&child_codes(units)))
            .plain(format!(
                ", con pressione massima ammissibile non superiore a 12 bar e pertanto, {}, non \
                 risultano soggetti a verifica di messa in servizio ma esclusivamente a \
                 dichiarazione di messa in servizio.",
                ARTS_4_5
            )),
        ChildStatus::Excluded => base.plain(format!(
            ", prive di recipienti di volume superiore a 25 litri e pertanto escluse {}.",
            ART_2I
        )),
        ChildStatus::InsufficientData => base
            .plain(", dotate di scambiatori di calore in pressione, individuati alle posizioni ")
            .italic(format_code_list(&child_codes(units)))
            .plain(format!(", che non riportano {}", MISSING_PLATE_DATA)),
    }
}

/// Pick the template for a family population
fn population_sentences(
    units: &[UnitStatus],
    singular: fn(&UnitStatus) -> Paragraph,
    plural: fn(ChildStatus, &[UnitStatus]) -> Paragraph,
) -> Vec<Paragraph> {
    match population(units) {
        None => Vec::new(),
        Some(Population::Uniform(_, [only])) => vec![singular(only)],
        Some(Population::Uniform(status, all)) => vec![plural(status, all)],
        Some(Population::Mixed(all)) => all.iter().map(singular).collect(),
    }
}

/// Ultrasonic thickness call-out for the tested codes of one family
pub fn thickness_callout(
    codes: &[&str],
    singular_noun: &str,
    plural_noun: &str,
) -> Option<Paragraph> {
    if codes.is_empty() {
        return None;
    }
    let count = codes.len();
    Some(
        sentence()
            .plain(INTEGRITY_PREAMBLE)
            .plain(format!("{} ", pluralize(count, singular_noun, plural_noun)))
            .italic(format_code_list(codes))
            .plain(format!(
                " {} a verifica spessimetrica, con esito positivo.",
                pluralize(count, "è stato sottoposto", "sono stati sottoposti")
            )),
    )
}

pub fn compressor_narrative(
    inventory: &Inventory,
    index: &EquipmentIndex<'_>,
    info: &AdditionalInfo,
) -> Vec<Paragraph> {
    let count = inventory.compressors.len();
    if count == 0 {
        return Vec::new();
    }

    let mut paragraphs = vec![
        caption(pluralize(count, "Compressore:", "Compressori:")),
        sentence().plain(
            "La regolazione della pressione di esercizio è gestita mediante sonde di pressione \
             e dalle valvole di sicurezza installate internamente per casi di eventuale \
             sovrappressione.",
        ),
        sentence().plain(format!(
            "{} dal campo di applicazione del D.M. 329/2004 in base a quanto previsto \
             dall'Art. 1, punto 3, lettera \"L\" del D.L. 93/2000.",
            pluralize(count, "Il compressore è escluso", "I compressori sono esclusi")
        )),
        sentence().plain("Nel caso in oggetto:"),
    ];

    let statuses = deoiler_statuses(inventory, index);
    paragraphs.extend(population_sentences(
        &statuses,
        deoiler_sentence,
        deoilers_plural_sentence,
    ));

    let tested: Vec<&str> = statuses
        .iter()
        .filter_map(|u| u.child_code.as_deref())
        .filter(|code| info.is_thickness_tested(code))
        .collect();
    paragraphs.extend(thickness_callout(
        &tested,
        "il serbatoio disoleatore",
        "i serbatoi disoleatori",
    ));

    paragraphs
}

pub fn dryer_narrative(
    inventory: &Inventory,
    index: &EquipmentIndex<'_>,
    info: &AdditionalInfo,
) -> Vec<Paragraph> {
    let count = inventory.dryers.len();
    if count == 0 {
        return Vec::new();
    }

    let mut paragraphs = vec![caption(pluralize(
        count,
        "Essiccatore a ciclo frigorifero:",
        "Essiccatori a ciclo frigorifero:",
    ))];

    let statuses = exchanger_statuses(inventory, index);
    paragraphs.extend(population_sentences(
        &statuses,
        dryer_sentence,
        dryers_plural_sentence,
    ));

    let tested: Vec<&str> = statuses
        .iter()
        .filter_map(|u| u.child_code.as_deref())
        .filter(|code| info.is_thickness_tested(code))
        .collect();
    paragraphs.extend(thickness_callout(
        &tested,
        "lo scambiatore di calore",
        "gli scambiatori di calore",
    ));

    paragraphs
}

fn tank_sentence(tank: &Tank, lead: &str) -> Paragraph {
    let code = tank.plate.code.as_str();
    let (volume, pressure) = match (tank.rating.volume_liters, tank.rating.max_pressure_bar) {
        (Some(v), Some(p)) => (v, p),
        _ => {
            return sentence()
                .plain(format!("{} serbatoio individuato alla posizione ", lead))
                .italic(code)
                .plain(format!(" non riporta {}", MISSING_PLATE_DATA))
        }
    };

    let head = sentence()
        .plain(format!("{} serbatoio individuato alla posizione ", lead))
        .italic(code);

    match classify(VesselClass::Tank, Some(volume), Some(pressure)).tag() {
        DispositionTag::Excluded => head.plain(format!(
            " ha volume pari a {} litri, inferiore a 50 litri, e pertanto è escluso {}.",
            volume, ART_2I
        )),
        tag => {
            let psv = pressure_volume_product(volume, pressure);
            let outcome = if tag == DispositionTag::VerificationRequired {
                format!(
                    "e quindi superiore a 8000. Pertanto, {}, risulta soggetto a verifica di \
                     messa in servizio.",
                    ARTS_4_5
                )
            } else {
                format!(
                    "e quindi non superiore a 8000. Pertanto, {}, non risulta soggetto a \
                     verifica di messa in servizio ma esclusivamente a dichiarazione di messa \
                     in servizio.",
                    ARTS_4_5
                )
            };
            head.plain(format!(
                " ha volume pari a {} litri e pressione massima ammissibile pari a {} bar. Il \
                 prodotto PS x V è pari a {} {}",
                volume, pressure, format_psv(psv), outcome
            ))
        }
    }
}

/// Condensate drain, finish, anchoring and gauge of a tank
pub fn tank_accessories(tank: &Tank) -> Paragraph {
    let mut text = format!(
        "È completo di scaricatore di condensa {} per prevenire l'accumulo di acqua in grado \
         di originare fenomeni di corrosione localizzata. ",
        tank.condensate_drain.label()
    );
    match tank.internal_finish {
        Some(InternalFinish::Galvanized) => text.push_str(
            "I fenomeni di corrosione sono inoltre minimizzati dalla finitura superficiale \
             zincata. ",
        ),
        Some(InternalFinish::Vitroflex) => text.push_str(
            "I fenomeni di corrosione sono inoltre minimizzati dalla finitura superficiale \
             vetrificata. ",
        ),
        Some(InternalFinish::Painted | InternalFinish::Raw) | None => {}
    }
    text.push_str("Risulta inoltre ");
    if tank.anchored {
        text.push_str("ancorato a terra, ");
    }
    text.push_str("dotato di manometro di controllo della pressione");
    match tank
        .gauge
        .as_ref()
        .and_then(|g| Some((g.full_scale_bar?, g.red_mark_bar?)))
    {
        Some((full_scale, red_mark)) => text.push_str(&format!(
            " riportante fondo scala a {} bar e segno rosso a {} bar.",
            full_scale, red_mark
        )),
        None => text.push('.'),
    }
    sentence().plain(text)
}

pub fn tank_narrative(inventory: &Inventory, info: &AdditionalInfo) -> Vec<Paragraph> {
    let tanks = &inventory.tanks;
    if tanks.is_empty() {
        return Vec::new();
    }

    let mut paragraphs = vec![caption(pluralize(
        tanks.len(),
        "Serbatoio di accumulo:",
        "Serbatoi di accumulo:",
    ))];

    let in_scope = tanks
        .iter()
        .filter(|t| {
            classify(
                VesselClass::Tank,
                t.rating.volume_liters,
                t.rating.max_pressure_bar,
            )
            .tag()
                != DispositionTag::Excluded
        })
        .count();
    if in_scope > 0 {
        paragraphs.push(sentence().plain(format!(
            "{} nel campo di applicazione del D.M. 329/2004.",
            pluralize(in_scope, "Rientra", "Rientrano")
        )));
    }

    if tanks.len() > 1 && tanks.iter().all(|t| t.safety_valve.is_some()) {
        paragraphs.push(sentence().plain(
            "Tutti i serbatoi di accumulo presenti sono dotati di valvole di sicurezza \
             opportunamente dimensionate, come dimostrato nel seguito del presente documento.",
        ));
    }

    let lead = if tanks.len() == 1 { "In particolare, il" } else { "il" };
    for tank in tanks {
        paragraphs.push(tank_sentence(tank, lead));
        paragraphs.push(tank_accessories(tank));
    }

    let tested: Vec<&str> = tanks
        .iter()
        .map(|t| t.plate.code.as_str())
        .filter(|code| info.is_thickness_tested(code))
        .collect();
    paragraphs.extend(thickness_callout(&tested, "il serbatoio", "i serbatoi"));

    paragraphs
}

/// Fixed text: piping diameters are not surveyed, DN ≤ 80 is stated as is
pub fn piping_exemption() -> Paragraph {
    sentence().plain(format!(
        "Tutte le tubazioni destinate a contenere aria compressa hanno DN≤80mm e pertanto \
         escluse {}.",
        ART_2I
    ))
}
