use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::{
    client::ContactRepository,
    model::{Contact, ContactDraft, ContactId},
    notification::Notifier,
};

use super::PendingConfirmation;

/// What a confirmed prompt will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactAction {
    ReplaceNumber { id: ContactId, draft: ContactDraft },
    Delete { id: ContactId, name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Name,
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(Contact),
    /// The create request failed; drafts are kept.
    Failed,
    Incomplete(MissingField),
    NeedsConfirmation(PendingConfirmation<ContactAction>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Updated(Contact),
    Deleted(ContactId),
    /// The server no longer knows the record; it was dropped locally.
    AlreadyRemoved(ContactId),
}

/// Case-insensitive substring match on the name. An empty filter keeps everything.
pub fn filter_contacts<'a>(contacts: &'a [Contact], filter: &str) -> Vec<&'a Contact> {
    let needle = filter.to_lowercase();
    contacts.iter().filter(|c| c.name.to_lowercase().contains(&needle)).collect()
}

/// Contact list, add form and delete actions.
#[derive(Debug)]
pub struct ContactListView {
    repo: Arc<dyn ContactRepository>,
    notifier: Notifier,
    contacts: Vec<Contact>,
    name: String,
    number: String,
    filter: String,
}

impl ContactListView {
    pub fn new(repo: Arc<dyn ContactRepository>, notifier: Notifier) -> Self {
        Self {
            repo,
            notifier,
            contacts: Vec::new(),
            name: String::new(),
            number: String::new(),
            filter: String::new(),
        }
    }

    pub async fn load(&mut self) {
        match self.repo.list().await {
            Ok(contacts) => {
                debug!(count = contacts.len(), "phonebook loaded");
                self.contacts = contacts;
            }
            Err(err) => {
                error!("failed to load phonebook: {err:#}");
                self.notifier.error("Failed to load phonebook");
            }
        }
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn name_draft(&self) -> &str {
        &self.name
    }

    pub fn number_draft(&self) -> &str {
        &self.number
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_number(&mut self, number: impl Into<String>) {
        self.number = number.into();
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    /// Contacts matching the current filter, in list order.
    pub fn visible(&self) -> Vec<&Contact> {
        filter_contacts(&self.contacts, &self.filter)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.has_name(name))
    }

    /// Submit the add form.
    ///
    /// A name already in the list never mutates anything here; it yields a confirmation
    /// that [`ContactListView::confirm`] turns into an update.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let name = self.name.trim();
        let number = self.number.trim();
        if name.is_empty() {
            return SubmitOutcome::Incomplete(MissingField::Name);
        }
        if number.is_empty() {
            return SubmitOutcome::Incomplete(MissingField::Number);
        }

        if let Some(existing) = self.find_by_name(name) {
            let prompt = format!("{} is already added. Replace the old number?", existing.name);
            let action = ContactAction::ReplaceNumber {
                id: existing.id.clone(),
                draft: ContactDraft::new(existing.name.clone(), number),
            };
            return SubmitOutcome::NeedsConfirmation(PendingConfirmation::new(prompt, action));
        }

        let draft = ContactDraft::new(name, number);
        match self.repo.create(&draft).await {
            Ok(created) => {
                self.notifier.success(format!("Added {}", created.name));
                self.contacts.push(created.clone());
                self.clear_drafts();
                SubmitOutcome::Created(created)
            }
            Err(err) => {
                warn!("failed to add {}: {err:#}", draft.name);
                self.notifier.error("Failed to add person");
                SubmitOutcome::Failed
            }
        }
    }

    /// Ask to delete `id`. Unknown ids yield nothing.
    pub fn request_delete(&self, id: &ContactId) -> Option<PendingConfirmation<ContactAction>> {
        let contact = self.contacts.iter().find(|c| c.id == *id)?;
        Some(PendingConfirmation::new(
            format!("Delete {}?", contact.name),
            ContactAction::Delete { id: contact.id.clone(), name: contact.name.clone() },
        ))
    }

    /// Resolve a prompt with "yes".
    pub async fn confirm(&mut self, pending: PendingConfirmation<ContactAction>) -> ConfirmOutcome {
        match pending.into_action() {
            ContactAction::ReplaceNumber { id, draft } => self.replace_number(id, draft).await,
            ContactAction::Delete { id, name } => self.delete(id, name).await,
        }
    }

    /// Resolve a prompt with "no". Nothing changes.
    pub fn decline(&self, pending: PendingConfirmation<ContactAction>) {
        debug!(prompt = pending.prompt(), "confirmation declined");
    }

    async fn replace_number(&mut self, id: ContactId, draft: ContactDraft) -> ConfirmOutcome {
        match self.repo.update(&id, &draft).await {
            Ok(updated) => {
                if let Some(slot) = self.contacts.iter_mut().find(|c| c.id == id) {
                    *slot = updated.clone();
                }
                self.notifier.success(format!("Updated {}", updated.name));
                self.clear_drafts();
                ConfirmOutcome::Updated(updated)
            }
            Err(err) => {
                warn!("failed to update {}: {err:#}", draft.name);
                self.notifier.error(removed_message(&draft.name));
                self.contacts.retain(|c| c.id != id);
                ConfirmOutcome::AlreadyRemoved(id)
            }
        }
    }

    async fn delete(&mut self, id: ContactId, name: String) -> ConfirmOutcome {
        let result = self.repo.remove(&id).await;
        self.contacts.retain(|c| c.id != id);

        match result {
            Ok(()) => {
                self.notifier.success(format!("Deleted {name}"));
                ConfirmOutcome::Deleted(id)
            }
            Err(err) => {
                warn!("failed to delete {name}: {err:#}");
                self.notifier.error(removed_message(&name));
                ConfirmOutcome::AlreadyRemoved(id)
            }
        }
    }

    fn clear_drafts(&mut self) {
        self.name.clear();
        self.number.clear();
    }
}

fn removed_message(name: &str) -> String {
    format!("Info of {name} was already removed from server")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        notification::Severity,
        testing::{FakeContacts, contact},
    };

    fn view_with(fake: &Arc<FakeContacts>) -> (ContactListView, Notifier) {
        let notifier = Notifier::new();
        let repo: Arc<dyn ContactRepository> = fake.clone();
        (ContactListView::new(repo, notifier.clone()), notifier)
    }

    async fn loaded(contacts: Vec<Contact>) -> (ContactListView, Notifier, Arc<FakeContacts>) {
        let fake = Arc::new(FakeContacts::with(contacts));
        let (mut view, notifier) = view_with(&fake);
        view.load().await;
        (view, notifier, fake)
    }

    fn names<'a>(contacts: impl IntoIterator<Item = &'a Contact>) -> Vec<&'a str> {
        contacts.into_iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let list = vec![
            contact("1", "Ann Arbor", "1"),
            contact("2", "Dan", "2"),
            contact("3", "Anna", "3"),
            contact("4", "Bob", "4"),
        ];

        assert_eq!(names(filter_contacts(&list, "ANN")), ["Ann Arbor", "Anna"]);
        assert_eq!(names(filter_contacts(&list, "an")), ["Ann Arbor", "Dan", "Anna"]);
        assert_eq!(filter_contacts(&list, "").len(), 4);
        assert!(filter_contacts(&list, "zz").is_empty());
    }

    #[tokio::test]
    async fn visible_follows_filter_text() {
        let (mut view, _, _) =
            loaded(vec![contact("1", "Ann Arbor", "1"), contact("2", "Bob", "2")]).await;

        view.set_filter("arb");
        assert_eq!(names(view.visible()), ["Ann Arbor"]);

        view.set_filter("");
        assert_eq!(view.visible().len(), 2);
    }

    #[tokio::test]
    async fn load_failure_notifies() {
        let fake = Arc::new(FakeContacts::failing());
        let (mut view, notifier) = view_with(&fake);

        view.load().await;

        assert!(view.contacts().is_empty());
        let n = notifier.current().expect("error shown");
        assert_eq!(n.message, "Failed to load phonebook");
        assert_eq!(n.severity, Severity::Error);
    }

    #[tokio::test]
    async fn create_appends_once_and_clears_drafts() {
        let (mut view, notifier, fake) = loaded(vec![contact("1", "Arto Hellas", "040")]).await;

        view.set_name("Ada Lovelace");
        view.set_number("39-44-5323523");
        let SubmitOutcome::Created(created) = view.submit().await else {
            panic!("expected a create");
        };
        assert_eq!(created.id, ContactId::new("101"));
        assert_eq!(view.contacts().iter().filter(|c| c.id == created.id).count(), 1);
        assert_eq!(view.name_draft(), "");
        assert_eq!(view.number_draft(), "");
        assert_eq!(notifier.current().map(|n| n.message), Some("Added Ada Lovelace".into()));
        assert_eq!(fake.calls(), ["list", "create Ada Lovelace"]);
    }

    #[tokio::test]
    async fn failed_create_keeps_drafts() {
        let fake = Arc::new(FakeContacts::failing());
        let (mut view, notifier) = view_with(&fake);

        view.set_name("Ada");
        view.set_number("123");
        assert_eq!(view.submit().await, SubmitOutcome::Failed);

        assert_eq!(view.name_draft(), "Ada");
        assert_eq!(view.number_draft(), "123");
        assert!(view.contacts().is_empty());
        let n = notifier.current().expect("error shown");
        assert_eq!((n.message.as_str(), n.severity), ("Failed to add person", Severity::Error));
    }

    #[tokio::test]
    async fn blank_fields_make_no_request() {
        let (mut view, notifier, fake) = loaded(vec![]).await;

        view.set_name("  ");
        view.set_number("123");
        assert_eq!(view.submit().await, SubmitOutcome::Incomplete(MissingField::Name));

        view.set_name("Ada");
        view.set_number("");
        assert_eq!(view.submit().await, SubmitOutcome::Incomplete(MissingField::Number));

        assert_eq!(fake.calls(), ["list"]);
        assert_eq!(notifier.current(), None);
    }

    #[tokio::test]
    async fn duplicate_name_asks_before_mutating() {
        let (mut view, _, fake) = loaded(vec![contact("1", "Arto Hellas", "040")]).await;

        view.set_name("arto hellas");
        view.set_number("050-999");
        let SubmitOutcome::NeedsConfirmation(pending) = view.submit().await else {
            panic!("expected confirmation");
        };
        assert_eq!(pending.prompt(), "Arto Hellas is already added. Replace the old number?");
        assert_eq!(fake.calls(), ["list"]);

        view.decline(pending);
        assert_eq!(view.contacts(), [contact("1", "Arto Hellas", "040")]);
        assert_eq!(view.name_draft(), "arto hellas");
    }

    #[tokio::test]
    async fn confirmed_duplicate_updates_in_place() {
        let (mut view, notifier, _) = loaded(vec![
            contact("1", "Arto Hellas", "040"),
            contact("2", "Ada", "39"),
        ])
        .await;

        view.set_name("ARTO HELLAS");
        view.set_number("050-999");
        let SubmitOutcome::NeedsConfirmation(pending) = view.submit().await else {
            panic!("expected confirmation");
        };

        let outcome = view.confirm(pending).await;

        let updated = contact("1", "Arto Hellas", "050-999");
        assert_eq!(outcome, ConfirmOutcome::Updated(updated.clone()));
        assert_eq!(view.contacts(), [updated, contact("2", "Ada", "39")]);
        assert_eq!(view.name_draft(), "");
        assert_eq!(notifier.current().map(|n| n.message), Some("Updated Arto Hellas".into()));
    }

    #[tokio::test]
    async fn update_of_vanished_record_drops_it_locally() {
        let (mut view, notifier, fake) = loaded(vec![contact("1", "Arto Hellas", "040")]).await;
        fake.forget("1");

        view.set_name("Arto Hellas");
        view.set_number("050");
        let SubmitOutcome::NeedsConfirmation(pending) = view.submit().await else {
            panic!("expected confirmation");
        };

        let outcome = view.confirm(pending).await;

        assert_eq!(outcome, ConfirmOutcome::AlreadyRemoved(ContactId::new("1")));
        assert!(view.contacts().is_empty());
        assert_eq!(view.number_draft(), "050");
        let n = notifier.current().expect("error shown");
        assert_eq!(n.severity, Severity::Error);
        assert_eq!(n.message, "Info of Arto Hellas was already removed from server");
    }

    #[tokio::test]
    async fn delete_after_confirmation() {
        let (mut view, notifier, fake) =
            loaded(vec![contact("1", "Arto Hellas", "040"), contact("2", "Ada", "39")]).await;

        let pending = view.request_delete(&ContactId::new("2")).expect("known id");
        assert_eq!(pending.prompt(), "Delete Ada?");

        let outcome = view.confirm(pending).await;

        assert_eq!(outcome, ConfirmOutcome::Deleted(ContactId::new("2")));
        assert_eq!(names(view.contacts()), ["Arto Hellas"]);
        assert_eq!(names(&fake.stored()), ["Arto Hellas"]);
        let n = notifier.current().expect("success shown");
        assert_eq!((n.message.as_str(), n.severity), ("Deleted Ada", Severity::Success));
    }

    #[tokio::test]
    async fn delete_of_vanished_record_still_removes_it() {
        let (mut view, notifier, fake) = loaded(vec![contact("1", "Arto Hellas", "040")]).await;
        fake.forget("1");

        let pending = view.request_delete(&ContactId::new("1")).expect("still listed locally");
        let outcome = view.confirm(pending).await;

        assert_eq!(outcome, ConfirmOutcome::AlreadyRemoved(ContactId::new("1")));
        assert!(view.visible().is_empty());
        assert_eq!(notifier.current().map(|n| n.severity), Some(Severity::Error));
    }

    #[tokio::test]
    async fn declined_delete_keeps_contact() {
        let (view, _, fake) = loaded(vec![contact("1", "Arto Hellas", "040")]).await;

        let pending = view.request_delete(&ContactId::new("1")).expect("known id");
        view.decline(pending);

        assert_eq!(view.contacts().len(), 1);
        assert_eq!(fake.calls(), ["list"]);
    }

    #[tokio::test]
    async fn unknown_id_has_nothing_to_confirm() {
        let (view, _, _) = loaded(vec![contact("1", "Arto Hellas", "040")]).await;
        assert!(view.request_delete(&ContactId::new("missing")).is_none());
    }
}
