// ABOUTME: In-memory directory of doctors, clients and products used by the forms
// Stands in for the remote API listings; selectors cycle through these entries

use super::role::ClientType;

const DOCTORS: &[&str] = &[
    "Dr. Amel Benali",
    "Dr. Karim Haddad",
    "Dr. Sofia Meziane",
    "Dr. Yacine Touati",
];

const PHARMACIES: &[&str] = &["Pharmacie du Centre", "Pharmacie El Amel", "Pharmacie Pasteur"];
const WHOLESALERS: &[&str] = &["Medi-Distrib", "Pharma Grossiste Est"];
const CLINICS: &[&str] = &["Clinique Les Oliviers", "Clinique Ibn Sina"];

const PRODUCTS: &[&str] = &[
    "Amoxil 500mg",
    "Doliprane 1g",
    "Ventolin inhaler",
    "Zyrtec 10mg",
    "Omeprazole 20mg",
];

/// Read-only listings for pickers
#[derive(Debug, Clone, Copy, Default)]
pub struct Directory;

impl Directory {
    pub const fn doctors(self) -> &'static [&'static str] {
        DOCTORS
    }

    pub const fn clients(self, client_type: ClientType) -> &'static [&'static str] {
        match client_type {
            ClientType::Pharmacy => PHARMACIES,
            ClientType::Wholesaler => WHOLESALERS,
            ClientType::Clinic => CLINICS,
        }
    }

    pub const fn products(self) -> &'static [&'static str] {
        PRODUCTS
    }

    /// Entry following `current` in `list`, wrapping; the first entry when nothing matches
    pub fn cycle(list: &'static [&'static str], current: Option<&str>) -> Option<&'static str> {
        if list.is_empty() {
            return None;
        }
        let next = current
            .and_then(|c| list.iter().position(|item| *item == c))
            .map_or(0, |idx| (idx + 1) % list.len());
        Some(list[next])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_through_doctors() {
        let dir = Directory;
        let first = Directory::cycle(dir.doctors(), None);
        assert_eq!(first, Some("Dr. Amel Benali"));
        let second = Directory::cycle(dir.doctors(), first);
        assert_eq!(second, Some("Dr. Karim Haddad"));
        let last = dir.doctors()[dir.doctors().len() - 1];
        assert_eq!(Directory::cycle(dir.doctors(), Some(last)), first);
    }

    #[test]
    fn test_cycle_empty_list() {
        assert_eq!(Directory::cycle(&[], None), None);
    }

    #[test]
    fn test_clients_depend_on_type() {
        let dir = Directory;
        assert!(dir.clients(ClientType::Wholesaler).contains(&"Medi-Distrib"));
        assert!(!dir.clients(ClientType::Pharmacy).contains(&"Medi-Distrib"));
    }
}
