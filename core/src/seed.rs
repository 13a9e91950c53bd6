//! Bundled contacts used when the remote list cannot be loaded.

use crate::types::{Contact, ContactId};

const SEED: [(i64, &str, u32); 8] = [
    (1, "Mamadou Diallo", 624123456),
    (2, "Fatoumata Bah", 621234567),
    (3, "Ibrahima Sow", 622345678),
    (4, "Aissatou Barry", 625456789),
    (5, "Thierno Baldé", 628567890),
    (6, "Mariama Camara", 626678901),
    (7, "Abdoulaye Touré", 623789012),
    (8, "Kadiatou Sylla", 627890123),
];

pub fn initial_contacts() -> Vec<Contact> {
    SEED.iter()
        .map(|&(id, nom, numero)| Contact {
            id: ContactId::Int(id),
            nom: nom.to_string(),
            numero,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::schema::ContactSchema;

    #[test]
    fn seed_is_valid_and_unique() {
        let contacts = initial_contacts();
        assert_eq!(contacts.len(), 8);
        let ids: HashSet<_> = contacts.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids.len(), contacts.len());
        for c in &contacts {
            assert!(ContactSchema.is_complete(&c.to_form_data()), "{c:?}");
        }
    }
}
