//! Run-length grouping of the verification column
//!
//! Consecutive entries with the same disposition share one merged cell in
//! the verification table. Grouping never reorders.

use crate::report::classifier::DispositionTag;
use crate::report::formatter::FormattedEquipmentEntry;

/// Tag a group is keyed by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupTag {
    Disposition(DispositionTag),
    /// Entries without any disposition; always singleton groups
    NotApplicable,
}

impl GroupTag {
    pub fn of(entry: &FormattedEquipmentEntry) -> Self {
        entry
            .disposition
            .as_ref()
            .map(|d| GroupTag::Disposition(d.tag()))
            .unwrap_or(GroupTag::NotApplicable)
    }

    /// Mark in the "declaration" column
    pub fn marks_declaration(&self) -> bool {
        *self == GroupTag::Disposition(DispositionTag::Declaration)
    }

    /// Mark in the "verification" column
    pub fn marks_verification(&self) -> bool {
        *self == GroupTag::Disposition(DispositionTag::VerificationRequired)
    }
}

/// Maximal contiguous run of entries sharing a tag
#[derive(Debug, Clone, PartialEq)]
pub struct Group<'a> {
    pub tag: GroupTag,
    pub entries: Vec<&'a FormattedEquipmentEntry>,
}

impl Group<'_> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn group_by_disposition(entries: &[FormattedEquipmentEntry]) -> Vec<Group<'_>> {
    let mut groups: Vec<Group<'_>> = Vec::new();

    for entry in entries {
        let tag = GroupTag::of(entry);
        match groups.last_mut() {
            Some(current) if current.tag == tag && tag != GroupTag::NotApplicable => {
                current.entries.push(entry);
            }
            _ => groups.push(Group {
                tag,
                entries: vec![entry],
            }),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EquipmentKind;
    use crate::report::classifier::VerificationDisposition;

    fn entry(position: &str, disposition: Option<VerificationDisposition>) -> FormattedEquipmentEntry {
        FormattedEquipmentEntry {
            position: position.to_string(),
            kind: EquipmentKind::Tank,
            description: String::new(),
            manufacturer: String::new(),
            model: String::new(),
            capacity: String::new(),
            pressure: String::new(),
            temperature: String::new(),
            category: String::new(),
            year: String::new(),
            serial: String::new(),
            disposition,
        }
    }

    fn decl() -> Option<VerificationDisposition> {
        Some(VerificationDisposition::Declaration(String::new()))
    }

    fn verif() -> Option<VerificationDisposition> {
        Some(VerificationDisposition::VerificationRequired(String::new()))
    }

    fn excl() -> Option<VerificationDisposition> {
        Some(VerificationDisposition::Excluded(String::new()))
    }

    fn sizes(groups: &[Group<'_>]) -> Vec<usize> {
        groups.iter().map(Group::len).collect()
    }

    #[test]
    fn test_contiguous_runs_only() {
        let entries = vec![
            entry("S1", decl()),
            entry("S2", decl()),
            entry("S3", verif()),
            entry("S4", decl()),
        ];
        let groups = group_by_disposition(&entries);

        assert_eq!(sizes(&groups), vec![2, 1, 1]);
        assert!(groups[0].tag.marks_declaration());
        assert!(groups[1].tag.marks_verification());
        assert!(groups[2].tag.marks_declaration());
    }

    #[test]
    fn test_not_applicable_is_never_merged() {
        let entries = vec![
            entry("C1", None),
            entry("C2", None),
            entry("S1", excl()),
            entry("S1.1", None),
            entry("S2", excl()),
            entry("S3", excl()),
        ];
        let groups = group_by_disposition(&entries);

        assert_eq!(sizes(&groups), vec![1, 1, 1, 1, 2]);
        assert_eq!(groups[0].tag, GroupTag::NotApplicable);
        assert_eq!(groups[4].tag, GroupTag::Disposition(DispositionTag::Excluded));
        assert!(!groups[4].tag.marks_declaration());
        assert!(!groups[4].tag.marks_verification());
    }

    #[test]
    fn test_order_is_preserved() {
        let entries = vec![
            entry("A", verif()),
            entry("B", decl()),
            entry("C", verif()),
            entry("D", verif()),
        ];
        let flattened: Vec<&str> = group_by_disposition(&entries)
            .iter()
            .flat_map(|g| g.entries.iter().map(|e| e.position.as_str()))
            .collect();
        assert_eq!(flattened, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_disposition(&[]).is_empty());
    }
}
