//! Create/edit form state

use super::list::ResourceList;
use super::notice::StatusMessage;
use crate::api::{ApiError, ResourceService};
use crate::models::{Editable, FieldSpec, FormValues};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

#[derive(Debug, Clone)]
pub struct EntityForm<E: Editable> {
    mode: FormMode,
    open: bool,
    editing: Option<E>,
    values: FormValues,
    focused: usize,
}

impl<E: Editable> Default for EntityForm<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Editable> EntityForm<E> {
    pub fn new() -> Self {
        Self {
            mode: FormMode::Create,
            open: false,
            editing: None,
            values: E::empty_form(),
            focused: 0,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn title(&self) -> String {
        let noun = E::KIND.singular();
        match self.mode {
            FormMode::Create => format!("Add {}", noun),
            FormMode::Edit => format!("Edit {}", noun),
        }
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing.as_ref().map(|entity| entity.id())
    }

    pub fn open_create(&mut self) {
        self.mode = FormMode::Create;
        self.editing = None;
        self.values = E::empty_form();
        self.focused = 0;
        self.open = true;
    }

    /// Values are re-seeded only when a different entity is passed in.
    pub fn open_edit(&mut self, entity: &E) {
        self.mode = FormMode::Edit;
        self.open = true;

        if self.editing_id() != Some(entity.id()) {
            self.values = entity.form_values();
            self.focused = 0;
        }
        self.editing = Some(entity.clone());
    }

    /// Close and drop all local state
    pub fn close(&mut self) {
        self.open = false;
        self.editing = None;
        self.values = E::empty_form();
        self.focused = 0;
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        E::form_fields()
    }

    pub fn value(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn set_value(&mut self, key: &'static str, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn focused_index(&self) -> usize {
        self.focused
    }

    pub fn focus_next(&mut self) {
        let count = self.fields().len();
        if count > 0 {
            self.focused = (self.focused + 1) % count;
        }
    }

    pub fn focus_prev(&mut self) {
        let count = self.fields().len();
        if count > 0 {
            self.focused = (self.focused + count - 1) % count;
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.fields().get(self.focused) {
            self.values.entry(field.key).or_default().push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(field) = self.fields().get(self.focused) {
            if let Some(value) = self.values.get_mut(field.key) {
                value.pop();
            }
        }
    }

    /// Required-field gate. Blank (after trimming) required values block submission.
    pub fn validate(&self) -> Result<E::Draft, ApiError> {
        let missing: Vec<&str> = self
            .fields()
            .iter()
            .filter(|field| field.required && self.value(field.key).trim().is_empty())
            .map(|field| field.label)
            .collect();

        match missing.as_slice() {
            [] => Ok(E::draft_from(&self.values)),
            [only] => Err(ApiError::Validation(format!("{} is required", only))),
            [init @ .., last] => Err(ApiError::Validation(format!(
                "{} and {} are required",
                init.join(", "),
                last
            ))),
        }
    }
}

/// Validate and send the form through the list's create/update.
///
/// The form closes on success and stays open with its values on failure.
pub async fn submit_form<S>(form: &mut EntityForm<S::Entity>, list: &mut ResourceList<S>) -> bool
where
    S: ResourceService,
    S::Entity: Editable<Draft = S::Draft>,
{
    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(e) => {
            list.notify(StatusMessage::error(e.to_string()));
            return false;
        }
    };

    let saved = match (form.mode(), form.editing_id()) {
        (FormMode::Create, _) => list.create(&draft).await,
        (FormMode::Edit, Some(id)) => {
            let id = id.to_string();
            list.update(&id, &draft).await
        }
        (FormMode::Edit, None) => false,
    };

    if saved {
        form.close();
    }
    saved
}
