// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Appointment, Case, Client, ClientId, EntityId, EntityStore, LawyerId, Record};

pub const NOT_ASSIGNED: &str = "Not Assigned";

/// Display name for a foreign key, or [`NOT_ASSIGNED`] when the key is
/// unset or the referenced record is not (or not yet) in `store`.
pub fn resolve_name<T: Record>(store: &EntityStore<T>, id: Option<T::Id>) -> &str {
    id.filter(|id| id.is_assigned())
        .and_then(|id| store.find(id))
        .map_or(NOT_ASSIGNED, T::display_name)
}

/// The lawyer currently assigned to `client_id`, if any.
pub fn assigned_lawyer(
    clients: &EntityStore<Client>,
    client_id: Option<ClientId>,
) -> Option<LawyerId> {
    let client = clients.find(client_id?)?;
    client.lawyer_id.filter(|id| id.is_assigned())
}

/// Records that carry a copied lawyer reference next to their client.
pub trait ClientLinked {
    fn client_id(&self) -> Option<ClientId>;
    fn stored_lawyer_id(&self) -> Option<LawyerId>;

    /// Resolves the lawyer through the client's current assignment so a
    /// reassignment shows up without rewriting the record; the stored copy
    /// is only used when the client is gone or unassigned.
    fn effective_lawyer_id(&self, clients: &EntityStore<Client>) -> Option<LawyerId> {
        assigned_lawyer(clients, self.client_id()).or(self.stored_lawyer_id())
    }
}

impl ClientLinked for Case {
    fn client_id(&self) -> Option<ClientId> {
        self.client_id
    }

    fn stored_lawyer_id(&self) -> Option<LawyerId> {
        self.lawyer_id
    }
}

impl ClientLinked for Appointment {
    fn client_id(&self) -> Option<ClientId> {
        self.client_id
    }

    fn stored_lawyer_id(&self) -> Option<LawyerId> {
        self.lawyer_id
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientLinked, NOT_ASSIGNED, resolve_name};
    use crate::{Case, CaseId, CaseStatus, Client, ClientId, EntityStore, LawyerId};

    fn client(id: i64, name: &str, lawyer: Option<i64>) -> Client {
        Client {
            id: ClientId::new(id),
            name: name.to_owned(),
            email: None,
            phone: None,
            address: None,
            lawyer_id: lawyer.map(LawyerId::new),
        }
    }

    #[test]
    fn unset_reference_is_not_assigned() {
        let store = EntityStore::from_records(vec![client(7, "X", None)]);
        assert_eq!(resolve_name(&store, None), NOT_ASSIGNED);
        assert_eq!(resolve_name(&store, Some(ClientId::new(0))), NOT_ASSIGNED);
    }

    #[test]
    fn missing_record_is_not_assigned() {
        let empty: EntityStore<Client> = EntityStore::new();
        assert_eq!(resolve_name(&empty, Some(ClientId::new(7))), NOT_ASSIGNED);
    }

    #[test]
    fn found_record_yields_its_name() {
        let store = EntityStore::from_records(vec![client(7, "X", None)]);
        assert_eq!(resolve_name(&store, Some(ClientId::new(7))), "X");
    }

    #[test]
    fn cases_resolve_by_title() {
        let store = EntityStore::from_records(vec![Case {
            id: CaseId::new(2),
            title: "Estate of Smith".to_owned(),
            description: String::new(),
            status: CaseStatus::Open,
            client_id: None,
            lawyer_id: None,
        }]);
        assert_eq!(resolve_name(&store, Some(CaseId::new(2))), "Estate of Smith");
    }

    #[test]
    fn effective_lawyer_follows_client_reassignment() {
        let case = Case {
            id: CaseId::new(1),
            title: "Lease".to_owned(),
            description: String::new(),
            status: CaseStatus::Open,
            client_id: Some(ClientId::new(3)),
            lawyer_id: Some(LawyerId::new(10)),
        };
        let reassigned = EntityStore::from_records(vec![client(3, "C", Some(11))]);
        assert_eq!(case.effective_lawyer_id(&reassigned), Some(LawyerId::new(11)));

        let unassigned = EntityStore::from_records(vec![client(3, "C", None)]);
        assert_eq!(case.effective_lawyer_id(&unassigned), Some(LawyerId::new(10)));
    }
}
