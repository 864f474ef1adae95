//! Report composition
//!
//! Each section is a pure function from the [`ReportContext`] to blocks;
//! [`build_document`] concatenates them in their fixed order.

use chrono::NaiveDate;

use crate::entities::{AdditionalInfo, Inventory, ReportInput, SafetyValve, SpeedRegulation};
use crate::report::blocks::{Align, Block, Cell, Paragraph, ReportDocument, Span, Table};
use crate::report::formatter::{
    format_inventory, number_text, EquipmentIndex, FormattedEquipmentEntry,
};
use crate::report::grouping::group_by_disposition;
use crate::report::narrative;

const CHECK_MARK: &str = "✓";

const COVER_TITLE_SIZE: usize = 36;
const COVER_COMPANY_SIZE: usize = 48;
const COVER_ADDRESS_SIZE: usize = 32;

const CHARACTERIZATION_HEADER: [&str; 9] = [
    "Pos.",
    "Descrizione",
    "Costruttore e Modello",
    "Capacità [l]\nAria producibile [l/min]\nPortata scaricata [l/min]",
    "Pressione massima [bar]\nPressione di taratura [bar]",
    "Tempera-\ntura [°C]",
    "Cate-\ngoria",
    "Anno",
    "Num. fabbrica",
];

const VERIFICATION_HEADER: [&str; 6] = [
    "Pos.",
    "Descrizione",
    "Costruttore e Modello",
    "Num. fabbrica",
    "Dichiaraz. messa in servizio",
    "Verifica messa in servizio",
];

/// Everything the sections read, derived once from the input
#[derive(Debug)]
pub struct ReportContext<'a> {
    pub input: &'a ReportInput,
    pub date: NaiveDate,
    pub index: EquipmentIndex<'a>,
    pub entries: Vec<FormattedEquipmentEntry>,
}

impl<'a> ReportContext<'a> {
    pub fn new(input: &'a ReportInput, date: NaiveDate) -> Self {
        let index = EquipmentIndex::build(&input.inventory);
        let entries = format_inventory(&input.inventory, &index);
        Self {
            input,
            date,
            index,
            entries,
        }
    }

    pub fn inventory(&self) -> &'a Inventory {
        &self.input.inventory
    }

    pub fn info(&self) -> &'a AdditionalInfo {
        &self.input.additional_info
    }

    /// Speed regulation of every compressor, in inventory order
    pub fn speeds(&self) -> Vec<SpeedRegulation> {
        self.inventory()
            .compressors
            .iter()
            .map(|c| self.info().speed_of(&c.plate.code))
            .collect()
    }
}

/// Compose the whole report
pub fn build_document(ctx: &ReportContext<'_>) -> ReportDocument {
    let sections = [
        cover(ctx),
        premise(ctx),
        general_description(ctx),
        characterization(ctx),
        fluids(),
        classification(ctx),
        safety_accessories(ctx),
        conclusions(),
    ];
    ReportDocument {
        blocks: sections.into_iter().flatten().collect(),
    }
}

fn heading(text: &str) -> Block {
    Block::heading(2, text)
}

fn subheading(text: &str) -> Block {
    Block::heading(3, text)
}

fn bullet(text: &str) -> Block {
    Paragraph::text(text).bullet().into()
}

// ---------------------------------------------------------------------------
// Cover
// ---------------------------------------------------------------------------

pub fn cover(ctx: &ReportContext<'_>) -> Vec<Block> {
    let customer = &ctx.input.customer;
    let site = &ctx.input.site_address;

    let title = Paragraph::new().align(Align::Center).push(
        Span::bold(
            "RELAZIONE TECNICA\nIMPIANTO ARIA COMPRESSA\n(Art.6, comma 1, lettera b – D.M. 329/2004)",
        )
        .sized(COVER_TITLE_SIZE),
    );

    let client = Paragraph::new()
        .align(Align::Center)
        .push(Span::bold(format!("Cliente {}", customer.company_name)).sized(COVER_COMPANY_SIZE))
        .push(
            Span::plain(format!(
                "\n{}\n{}",
                customer.legal_address.street_line(),
                customer.legal_address.locality_line()
            ))
            .sized(COVER_ADDRESS_SIZE),
        );

    let site = Paragraph::new()
        .align(Align::Center)
        .push(Span::bold("Sito produttivo in").sized(COVER_ADDRESS_SIZE))
        .push(
            Span::plain(format!("\n{}\n{}", site.street_line(), site.locality_line()))
                .sized(COVER_ADDRESS_SIZE),
        );

    vec![
        Block::Framed(title),
        Block::Blank,
        Block::Framed(client),
        Block::Blank,
        Block::Framed(site),
        Block::Blank,
        revision_table(ctx).into(),
        Block::PageBreak,
    ]
}

/// Signature row, header, two empty past revisions and the current issue
pub fn revision_table(ctx: &ReportContext<'_>) -> Table {
    let technician = match ctx.info().technician.as_deref() {
        Some(name) if !name.trim().is_empty() => {
            format!("Il Tecnico\n{}\n\n________________________", name.trim())
        }
        _ => "Il Tecnico\n\n________________________".to_string(),
    };
    let (revision, subject) = match ctx.info().revision_reason.as_deref() {
        Some(reason) if !reason.trim().is_empty() => ("1", reason.trim().to_string()),
        _ => ("0", "prima emissione".to_string()),
    };

    Table::new(3)
        .row(vec![
            Cell::text("L'Utilizzatore\n\n________________________").spanning_cols(2),
            Cell::text(technician),
        ])
        .header(&["DATA", "REV.", "OGGETTO"])
        .row(vec![Cell::text("-"), Cell::text(""), Cell::text("")])
        .row(vec![Cell::text("-"), Cell::text(""), Cell::text("")])
        .row(vec![
            Cell::text(ctx.date.format("%d/%m/%Y").to_string()),
            Cell::text(revision),
            Cell::text(subject),
        ])
}

// ---------------------------------------------------------------------------
// Premise and general description
// ---------------------------------------------------------------------------

pub fn premise(ctx: &ReportContext<'_>) -> Vec<Block> {
    let input = ctx.input;
    let info = ctx.info();

    let mut blocks = vec![
        heading("Premessa"),
        narrative::premise_opening(
            &input.customer.company_name,
            &input.customer.legal_address,
            &input.site_address,
            &input.activity_description,
        )
        .into(),
        Block::text(
            "Essa, coerentemente alla vigente normativa di settore (PED 68/2014/UE, 29/2014/UE \
             e D.M. 329/2004) è finalizzata a descrivere le condizioni di installazione e di \
             esercizio e le misure di sicurezza adottate.",
        ),
        Block::text(
            "L'impianto in oggetto non costituisce \"impianto\" o \"insieme\" così come definiti \
             dalla PED e pertanto non risulta necessario l'intervento di un Organismo Notificato \
             per la certificazione delle attività previste dalla PED. Ogni componente installato \
             risulta infatti dotato di marcatura CE all'origine.",
        ),
    ];
    blocks.extend(
        narrative::revision_sentence(info.revision_reason.as_deref()).map(Block::from),
    );
    blocks.extend(narrative::thickness_premise(&info.thickness_tested).map(Block::from));
    blocks
}

pub fn general_description(ctx: &ReportContext<'_>) -> Vec<Block> {
    let inventory = ctx.inventory();
    let flags = &ctx.info().installation;

    let mut blocks = vec![
        heading("Descrizione generale dell'impianto"),
        Block::text(
            "L'impianto in oggetto è finalizzato alla produzione e distribuzione di aria \
             compressa a servizio delle utenze di produzione.",
        ),
        Block::text(
            "Le apparecchiature che compongono l'impianto in oggetto sono state installate \
             conformemente ai manuali d'uso e manutenzione forniti dai rispettivi fabbricanti ed \
             in possesso della Ditta, ed utilizzate entro i limiti operativi indicati.",
        ),
        narrative::room_description(flags).into(),
    ];
    blocks.extend(narrative::dedicated_room_sentence(flags).map(Block::from));

    blocks.push(Block::text("Esso è costituito dalle seguenti sezioni principali:"));
    blocks.push(narrative::pumping_section(&ctx.speeds()).into());
    blocks.push(narrative::storage_section(inventory.tanks.len()).into());
    blocks.extend(
        narrative::treatment_section(inventory.dryers.len(), inventory.filters.len())
            .map(Block::from),
    );
    blocks.extend(narrative::separator_section(inventory.separators.len()).map(Block::from));
    blocks.push(bullet("Raccolta delle condense in tanica dedicata"));
    blocks.push(Block::Blank);

    blocks.extend(
        narrative::wiring_sentences(ctx.info(), &ctx.index)
            .into_iter()
            .map(Block::from),
    );
    blocks.push(narrative::intake_air_sentence(flags).into());
    blocks.push(Block::text(
        "L'impianto è protetto contro i rischi da sovrappressione dalle valvole di sicurezza \
         nel seguito descritte. La portata e la pressione di progetto sono state determinate a \
         partire dalle effettive esigenze produttive della Ditta.",
    ));
    blocks.push(Block::Blank);
    blocks
}

// ---------------------------------------------------------------------------
// Equipment tables
// ---------------------------------------------------------------------------

fn maker_cell(entry: &FormattedEquipmentEntry) -> Cell {
    Cell::text(format!("{}\nModello: {}", entry.manufacturer, entry.model))
}

pub fn characterization_table(entries: &[FormattedEquipmentEntry]) -> Table {
    let mut table = Table::new(CHARACTERIZATION_HEADER.len()).header(&CHARACTERIZATION_HEADER);
    for entry in entries {
        table.push_row(vec![
            Cell::text(&entry.position),
            Cell::text(&entry.description),
            maker_cell(entry),
            Cell::text(&entry.capacity),
            Cell::text(&entry.pressure),
            Cell::text(&entry.temperature),
            Cell::text(&entry.category),
            Cell::text(&entry.year),
            Cell::text(&entry.serial),
        ]);
    }
    table
}

/// Every entry is listed; the two mark columns merge over each group
pub fn verification_table(entries: &[FormattedEquipmentEntry]) -> Table {
    let mut table = Table::new(VERIFICATION_HEADER.len()).header(&VERIFICATION_HEADER);

    for group in group_by_disposition(entries) {
        let span = group.len();
        for (i, entry) in group.entries.iter().enumerate() {
            let mut row = vec![
                Cell::text(&entry.position),
                Cell::text(&entry.description),
                maker_cell(entry),
                Cell::text(&entry.serial),
            ];
            if i == 0 {
                let mark = |on: bool| Cell::text(if on { CHECK_MARK } else { "" }).spanning_rows(span);
                row.push(mark(group.tag.marks_declaration()));
                row.push(mark(group.tag.marks_verification()));
            }
            table.push_row(row);
        }
    }
    table
}

pub fn characterization(ctx: &ReportContext<'_>) -> Vec<Block> {
    vec![
        Block::PageBreak,
        heading("Caratterizzazione delle apparecchiature"),
        Block::text(
            "Lo schema sotto riportato rappresenta i principali elementi che compongono \
             l'impianto e la loro logica di assemblaggio:",
        ),
        Paragraph::new().align(Align::Center).italic("SCHEMA").into(),
        Block::text(
            "Con riferimento alla numerazione dello schema sopra riportato la tabella seguente \
             riassume le caratteristiche delle principali apparecchiature che compongono \
             l'impianto:",
        ),
        characterization_table(&ctx.entries).into(),
        Block::Blank,
        Block::text(
            "La tabella che segue identifica la procedura a cui sono soggette le apparecchiature \
             ai sensi del DM 329/2004:",
        ),
        verification_table(&ctx.entries).into(),
        Block::Blank,
    ]
}

pub fn fluids() -> Vec<Block> {
    vec![
        Block::PageBreak,
        heading("FLUIDI A CONTATTO CON LE APPARECCHIATURE"),
        Block::text(
            "Il fluido a contatto con le parti in pressione è ARIA (Gruppo 2 ai sensi dell'art. \
             9 del D.Lgs. 93/2000).",
        ),
        Block::Blank,
    ]
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

pub fn classification(ctx: &ReportContext<'_>) -> Vec<Block> {
    let inventory = ctx.inventory();
    let info = ctx.info();

    let mut blocks = vec![
        heading("CLASSIFICAZIONE DELLE APPARECCHIATURE E RELATIVI Sistemi di protezione e controllo"),
        Block::text(
            "Le apparecchiature che compongono l'impianto sono dotate dei seguenti sistemi di \
             protezione e controllo a garanzia delle condizioni di sicurezza del sistema:",
        ),
        Block::Blank,
    ];

    let families = [
        narrative::compressor_narrative(inventory, &ctx.index, info),
        narrative::dryer_narrative(inventory, &ctx.index, info),
        narrative::tank_narrative(inventory, info),
    ];
    for family in families.into_iter().filter(|f| !f.is_empty()) {
        blocks.extend(family.into_iter().map(Block::from));
        blocks.push(Block::Blank);
    }

    blocks.push(subheading("Tubazioni:"));
    blocks.push(narrative::piping_exemption().into());
    blocks.push(Block::Blank);
    blocks
}

// ---------------------------------------------------------------------------
// Safety accessories
// ---------------------------------------------------------------------------

/// One safety valve and the figures it is checked against
#[derive(Debug, Clone, PartialEq)]
pub struct ValveCheck {
    pub position: String,
    pub serial: String,
    /// Vessel the valve is mounted on
    pub protected: String,
    /// Compressors discharging into the protected vessel
    pub connected: Vec<String>,
    pub vessel_pressure_bar: Option<f64>,
    pub set_pressure_bar: Option<f64>,
    /// Flow the valve must be able to discharge, l/min
    pub required_flow_l_min: Option<f64>,
    pub discharge_l_min: Option<f64>,
}

impl ValveCheck {
    fn new(vessel_code: &str, vessel_pressure: Option<f64>, valve: &SafetyValve) -> Self {
        Self {
            position: format!("{}.1", vessel_code),
            serial: valve.serial_number.clone().unwrap_or_default(),
            protected: vessel_code.to_string(),
            connected: Vec::new(),
            vessel_pressure_bar: vessel_pressure,
            set_pressure_bar: valve.set_pressure_bar,
            required_flow_l_min: None,
            discharge_l_min: valve.rated_discharge_l_min,
        }
    }

    /// Set pressure must not exceed PS; `None` when either is unknown
    pub fn pressure_adequate(&self) -> Option<bool> {
        Some(self.set_pressure_bar? <= self.vessel_pressure_bar?)
    }

    /// Discharge must exceed the connected flow; `None` when either is unknown
    pub fn flow_adequate(&self) -> Option<bool> {
        Some(self.discharge_l_min? > self.required_flow_l_min?)
    }
}

fn verdict(check: Option<bool>) -> &'static str {
    match check {
        Some(true) => "SI",
        Some(false) => "NO",
        None => "-",
    }
}

fn or_dash(text: String) -> String {
    if text.is_empty() {
        "-".to_string()
    } else {
        text
    }
}

/// Sum of the compressors' flows; unknown if any of them is unknown
fn total_flow(flows: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let mut total = None;
    for flow in flows {
        total = Some(total.unwrap_or(0.0) + flow?);
    }
    total
}

/// Valve checks in table order: deoiler valves, then tank valves
///
/// A tank valve is checked against the compressors wired to the tank, or
/// against the whole pumping section when no wiring is given for it.
pub fn valve_checks(ctx: &ReportContext<'_>) -> Vec<ValveCheck> {
    let inventory = ctx.inventory();
    let mut checks = Vec::new();

    for compressor in &inventory.compressors {
        let Some(deoiler) = ctx.index.deoiler_of(&compressor.plate.code) else {
            continue;
        };
        if let Some(valve) = &deoiler.safety_valve {
            checks.push(ValveCheck {
                connected: vec![compressor.plate.code.clone()],
                required_flow_l_min: compressor.flow_l_min,
                ..ValveCheck::new(&deoiler.plate.code, deoiler.rating.max_pressure_bar, valve)
            });
        }
    }

    for tank in &inventory.tanks {
        let Some(valve) = &tank.safety_valve else {
            continue;
        };
        let wired: Vec<&str> = ctx
            .info()
            .compressor_tanks
            .iter()
            .filter(|(_, tanks)| tanks.contains(&tank.plate.code))
            .map(|(compressor, _)| compressor.as_str())
            .filter(|code| ctx.index.compressor(code).is_some())
            .collect();

        let (connected, required) = if wired.is_empty() {
            (
                Vec::new(),
                total_flow(inventory.compressors.iter().map(|c| c.flow_l_min)),
            )
        } else {
            let flows = wired
                .iter()
                .map(|code| ctx.index.compressor(code).and_then(|c| c.flow_l_min));
            (
                wired.iter().map(|c| c.to_string()).collect(),
                total_flow(flows),
            )
        };

        checks.push(ValveCheck {
            connected,
            required_flow_l_min: required,
            ..ValveCheck::new(&tank.plate.code, tank.rating.max_pressure_bar, valve)
        });
    }

    checks
}

fn connected_text(check: &ValveCheck) -> String {
    if check.connected.is_empty() {
        check.protected.clone()
    } else {
        format!(
            "{} ({})",
            check.protected,
            narrative::format_code_list(&check.connected)
        )
    }
}

pub fn flow_table(checks: &[ValveCheck]) -> Table {
    let mut table = Table::new(6).header(&[
        "Pos.",
        "n.f. valvola",
        "Apparecchiature connesse",
        "Portata massima da elaborare [l/min]",
        "Portata scaricata [l/min]",
        "Adeguato",
    ]);
    if checks.is_empty() {
        return table.row(vec![Cell::text("-"); 6]);
    }
    for check in checks {
        table.push_row(vec![
            Cell::text(&check.position),
            Cell::text(or_dash(check.serial.clone())),
            Cell::text(connected_text(check)),
            Cell::text(or_dash(number_text(check.required_flow_l_min))),
            Cell::text(or_dash(number_text(check.discharge_l_min))),
            Cell::text(verdict(check.flow_adequate())),
        ]);
    }
    table
}

pub fn pressure_table(checks: &[ValveCheck]) -> Table {
    let mut table = Table::new(6).header(&[
        "Pos.",
        "n.f. valvola",
        "Apparecchiatura protetta",
        "PS [bar]",
        "Pressione di taratura [bar]",
        "Adeguato",
    ]);
    if checks.is_empty() {
        return table.row(vec![Cell::text("-"); 6]);
    }
    for check in checks {
        table.push_row(vec![
            Cell::text(&check.position),
            Cell::text(or_dash(check.serial.clone())),
            Cell::text(&check.protected),
            Cell::text(or_dash(number_text(check.vessel_pressure_bar))),
            Cell::text(or_dash(number_text(check.set_pressure_bar))),
            Cell::text(verdict(check.pressure_adequate())),
        ]);
    }
    table
}

/// Outcome sentence for one of the two checks
fn outcome_sentence(results: &[Option<bool>], satisfied: &str) -> Block {
    if results.is_empty() {
        Block::text("Non risultano valvole di sicurezza installate sulle apparecchiature censite.")
    } else if results.iter().any(|r| *r == Some(false)) {
        Block::text(
            "La verifica non risulta soddisfatta per le valvole contrassegnate con \"NO\" nella \
             tabella seguente, che devono essere sostituite o ritarate.",
        )
    } else if results.iter().any(Option::is_none) {
        Block::text(
            "La verifica risulta soddisfatta per le valvole di cui sono noti i dati di targa; \
             per quelle contrassegnate con \"-\" deve essere completata sulla base della \
             documentazione del fabbricante.",
        )
    } else {
        Block::text(satisfied)
    }
}

pub fn safety_accessories(ctx: &ReportContext<'_>) -> Vec<Block> {
    let checks = valve_checks(ctx);
    let flow: Vec<Option<bool>> = checks.iter().map(ValveCheck::flow_adequate).collect();
    let pressure: Vec<Option<bool>> = checks.iter().map(ValveCheck::pressure_adequate).collect();

    vec![
        Block::PageBreak,
        heading("DISPOSITIVI DI PROTEZIONE (Accessori di sicurezza)"),
        Block::text(
            "Come desumibile dalle dichiarazioni di conformità rilasciate dai Fabbricanti, gli \
             accessori di sicurezza installati a protezione delle apparecchiature a pressione \
             risultano idonei per il fluido contenuto e per le condizioni di esercizio.",
        ),
        Block::Blank,
        subheading("Verifica portata di scarico"),
        outcome_sentence(
            &flow,
            "Dalle verifiche condotte, la portata di scarico garantita dalle valvole di \
             sicurezza risulta superiore alla massima portata elaborabile dai compressori o \
             dalla capacità di generazione del sistema e pertanto la verifica risulta \
             soddisfatta.",
        ),
        Block::Blank,
        flow_table(&checks).into(),
        Block::Blank,
        Paragraph::new()
            .push(Span::italic("Regole di compilazione della tabella:").sized(20))
            .into(),
        bullet(
            "La colonna \"Adeguato\" è spuntata se il valore della colonna \"Portata scaricata\" \
             è maggiore del valore riportato nella colonna \"Portata massima da elaborare\".",
        ),
        Block::Blank,
        subheading("Verifica pressione di taratura"),
        outcome_sentence(
            &pressure,
            "La pressione di taratura delle valvole risulta adeguata alla pressione massima \
             ammissibile delle attrezzature protette e la verifica risulta positiva.",
        ),
        Block::Blank,
        pressure_table(&checks).into(),
        Block::Blank,
    ]
}

// ---------------------------------------------------------------------------
// Conclusions
// ---------------------------------------------------------------------------

pub fn conclusions() -> Vec<Block> {
    vec![
        Block::PageBreak,
        heading("CONCLUSIONI"),
        Block::text(
            "Dall'esame della documentazione tecnica esibita e/o reperita, si attesta che, per \
             quanto concerne le verifiche di competenza:",
        ),
        bullet(
            "le attrezzature a pressione e gli insiemi descritti in premessa, risultano \
             installati in conformità alle disposizioni legislative vigenti (D.M. 329/04) e \
             idonei all'esercizio.",
        ),
        Block::Blank,
        Block::PageBreak,
        subheading("Verifiche periodiche"),
        Block::text(
            "Le attrezzature rientranti nel campo di applicazione del D.M. 329/2004 sono \
             soggette a riqualificazione periodica secondo le scadenze riportate nella tabella \
             seguente.",
        ),
        Table::new(3)
            .header(&["Descrizione", "riqualificazione", "Integrità"])
            .row(vec![
                Cell::text("Recipienti per gas compressi non corrosivi (Aria compressa)"),
                Cell::text("Decennale"),
                Cell::text("Decennale"),
            ])
            .row(vec![
                Cell::text("Tubazioni per gas compressi non corrosivi (Aria compressa)"),
                Cell::text("Decennale"),
                Cell::text("Decennale"),
            ])
            .into(),
        Block::Blank,
        Block::PageBreak,
        heading("ALLEGATI"),
        Block::text("Alla presente relazione tecnica si allegano:"),
        bullet("Layout dell'impianto con identificazione delle attrezzature;"),
        bullet("Schema P&Id;"),
        bullet("Dichiarazione di conformità dell'insieme (ove prevista);"),
        bullet("Verifiche di integrità (ove previste)."),
        Block::Blank,
    ]
}
