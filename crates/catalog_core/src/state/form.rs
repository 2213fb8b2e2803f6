//! Product create/edit form state.
//!
//! # Responsibility
//! - Resolve create vs. edit mode from an explicit `FormRequest`.
//! - Keep `date_revision` derived from `date_release`.
//! - Run field validation, including the blur-triggered id uniqueness check.
//! - Submit create/update requests and map backend rejections to text.
//!
//! # Invariants
//! - `date_revision` is never set directly; it is always recomputed from
//!   `date_release` (empty when the release is empty or unparseable).
//! - In edit mode `id` is disabled and keeps its value across resets.
//! - A generated candidate id is checked for uniqueness as soon as it is
//!   written; user edits to `id` are checked (and count as modified) on blur.
//! - An invalid form never reaches the gateway on submit.
//! - Disabled fields do not count toward validity but are part of the payload.

use crate::gateway::{GatewayError, GatewayResult, ProductsGateway};
use crate::model::date::{derive_revision_date, local_today};
use crate::model::product::{Product, ProductId, ProductUpdate};
use crate::route::{FormRequest, Navigation, Route};
use crate::validation::id_check::{is_id_taken, IdAvailability, IdCheckGuard, IdCheckTicket};
use crate::validation::{validate_field, FieldError, ProductField};
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const NOT_FOUND_MESSAGE: &str = "Product not found.";
pub const LOAD_FAILED_MESSAGE: &str = "Could not load the product.";
pub const CREATE_FAILED_MESSAGE: &str = "Could not create the product.";
pub const UPDATE_FAILED_MESSAGE: &str = "Could not update the product.";

const GENERATED_ID_LEN: usize = 8;

/// Calendar clock used by the release-date rule.
pub type TodayFn = fn() -> NaiveDate;

/// Whether the form creates a new record or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: ProductId },
}

impl FormMode {
    pub fn edit_id(&self) -> Option<&str> {
        match self {
            Self::Create => None,
            Self::Edit { id } => Some(id.as_str()),
        }
    }
}

/// Value plus interaction flags of one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub value: String,
    /// Field lost focus at least once.
    pub touched: bool,
    /// User changed the value.
    pub dirty: bool,
    pub disabled: bool,
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Local validation failed; every field is now touched.
    Invalid,
    /// Persisted; the caller should follow the navigation.
    Saved(Navigation),
    /// Gateway rejected or failed; see `error()`.
    Failed,
}

/// Gateway call prepared by [`ProductFormState::begin_submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRequest {
    Create(Product),
    Update { id: ProductId, update: ProductUpdate },
}

impl SubmitRequest {
    pub async fn send<G: ProductsGateway + ?Sized>(&self, gateway: &G) -> GatewayResult<()> {
        match self {
            Self::Create(product) => gateway.create(product).await.map(|_| ()),
            Self::Update { id, update } => gateway.update(id, update).await,
        }
    }
}

/// Render model of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub field: ProductField,
    pub value: String,
    pub disabled: bool,
    /// Failing and interacted with.
    pub show_invalid: bool,
    pub errors: Vec<String>,
}

/// Render model of the whole form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub mode: FormMode,
    pub fields: Vec<FieldView>,
    pub id_availability: IdAvailability,
    pub saving: bool,
    pub error: Option<String>,
    pub submittable: bool,
}

/// Form state bound to a gateway.
pub struct ProductFormState<G: ProductsGateway> {
    gateway: G,
    mode: FormMode,
    fields: BTreeMap<ProductField, FieldState>,
    id_guard: IdCheckGuard,
    id_availability: IdAvailability,
    /// `id` edited since its last blur.
    id_uncommitted: bool,
    saving: bool,
    error: Option<String>,
    today: TodayFn,
}

impl<G: ProductsGateway> ProductFormState<G> {
    /// Opens the form using the local calendar day for date validation.
    pub async fn open(gateway: G, request: FormRequest) -> Self {
        Self::open_with_clock(gateway, request, local_today).await
    }

    /// Opens the form with an explicit clock.
    ///
    /// - No `edit_id`: create mode with a generated candidate id, checked
    ///   for uniqueness before returning.
    /// - `edit_id` plus a record with the same id: populated directly.
    /// - `edit_id` otherwise: populated through [`Self::load_for_edit`].
    pub async fn open_with_clock(gateway: G, request: FormRequest, today: TodayFn) -> Self {
        let mut form = Self::blank(gateway, today);

        let Some(edit_id) = request.edit_id else {
            form.field_mut(ProductField::Id).value = generate_candidate_id();
            form.check_id().await;
            debug!("event=form_open module=form mode=create status=ok");
            return form;
        };

        form.mode = FormMode::Edit {
            id: edit_id.clone(),
        };
        form.field_mut(ProductField::Id).disabled = true;

        match request.product {
            Some(product) if product.id == edit_id => {
                debug!(
                    "event=form_open module=form mode=edit source=navigation id={}",
                    edit_id
                );
                form.populate(&product);
            }
            _ => form.load_for_edit().await,
        }
        form
    }

    fn blank(gateway: G, today: TodayFn) -> Self {
        let mut fields = ProductField::ALL
            .into_iter()
            .map(|field| (field, FieldState::default()))
            .collect::<BTreeMap<_, _>>();
        if let Some(revision) = fields.get_mut(&ProductField::DateRevision) {
            revision.disabled = true;
        }

        Self {
            gateway,
            mode: FormMode::Create,
            fields,
            id_guard: IdCheckGuard::new(),
            id_availability: IdAvailability::Unchecked,
            id_uncommitted: false,
            saving: false,
            error: None,
            today,
        }
    }

    /// Fallback edit path: fetches the catalog and picks the edited record.
    ///
    /// Sets the not-found or load-failed message when that fails; the form is
    /// left empty in both cases. No-op in create mode.
    pub async fn load_for_edit(&mut self) {
        let Some(edit_id) = self.mode.edit_id().map(str::to_string) else {
            return;
        };

        match self.gateway.list().await {
            Ok(products) => match products.into_iter().find(|p| p.id == edit_id) {
                Some(found) => {
                    info!(
                        "event=form_open module=form mode=edit source=fetch status=ok id={}",
                        edit_id
                    );
                    self.populate(&found);
                }
                None => {
                    warn!(
                        "event=form_open module=form mode=edit source=fetch status=not_found id={}",
                        edit_id
                    );
                    self.error = Some(NOT_FOUND_MESSAGE.to_string());
                }
            },
            Err(err) => {
                warn!(
                    "event=form_open module=form mode=edit source=fetch status=error id={} error={}",
                    edit_id, err
                );
                self.error = Some(LOAD_FAILED_MESSAGE.to_string());
            }
        }
    }

    fn populate(&mut self, product: &Product) {
        self.field_mut(ProductField::Id).value = product.id.clone();
        self.field_mut(ProductField::Name).value = product.name.clone();
        self.field_mut(ProductField::Description).value = product.description.clone();
        self.field_mut(ProductField::Logo).value = product.logo.clone();
        self.field_mut(ProductField::DateRelease).value = product.date_release.clone();
        self.sync_revision();
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn id_availability(&self) -> IdAvailability {
        self.id_availability
    }

    pub fn field(&self, field: ProductField) -> &FieldState {
        // Every field is inserted by `blank`.
        &self.fields[&field]
    }

    pub fn value(&self, field: ProductField) -> &str {
        self.field(field).value.as_str()
    }

    fn field_mut(&mut self, field: ProductField) -> &mut FieldState {
        self.fields.entry(field).or_default()
    }

    /// User edit of `field`.
    ///
    /// Disabled fields ignore edits and return `false`. Editing
    /// `date_release` recomputes `date_revision`; editing `id` discards any
    /// outstanding uniqueness check and marks the id modified only once it
    /// is blurred.
    pub fn set_value(&mut self, field: ProductField, value: impl Into<String>) -> bool {
        if self.field(field).disabled {
            debug!(
                "event=field_edit module=form status=skipped field={} reason=disabled",
                field
            );
            return false;
        }

        let state = self.field_mut(field);
        state.value = value.into();
        if field != ProductField::Id {
            state.dirty = true;
        }

        match field {
            ProductField::DateRelease => self.sync_revision(),
            ProductField::Id => {
                self.id_uncommitted = true;
                self.id_guard.invalidate();
                self.id_availability = IdAvailability::Unchecked;
            }
            _ => {}
        }
        true
    }

    /// Marks `field` as having lost focus.
    pub fn touch(&mut self, field: ProductField) {
        self.field_mut(field).touched = true;
    }

    fn sync_revision(&mut self) {
        let revision = derive_revision_date(self.value(ProductField::DateRelease));
        self.field_mut(ProductField::DateRevision).value = revision;
    }

    /// Starts a uniqueness check for the current id.
    ///
    /// Returns `None` (and discards outstanding checks) when the id is empty
    /// or disabled.
    pub fn begin_id_check(&mut self) -> Option<IdCheckTicket> {
        let id = self.field(ProductField::Id);
        let (disabled, value) = (id.disabled, id.value.clone());
        if disabled || value.is_empty() {
            self.id_guard.invalidate();
            self.id_availability = IdAvailability::Unchecked;
            return None;
        }

        let ticket = self.id_guard.issue(value);
        self.id_availability = IdAvailability::Pending;
        Some(ticket)
    }

    /// Applies a finished check; stale tickets are discarded.
    ///
    /// Returns whether the result was applied.
    pub fn apply_id_check(&mut self, ticket: &IdCheckTicket, taken: bool) -> bool {
        if !self.id_guard.is_current(ticket) {
            debug!(
                "event=id_check module=form status=stale token={}",
                ticket.token()
            );
            return false;
        }
        self.id_availability = if taken {
            IdAvailability::Taken
        } else {
            IdAvailability::Available
        };
        true
    }

    /// Blur handler for `id`: marks it touched (and modified if edited
    /// since the last blur) and runs the uniqueness check.
    pub async fn blur_id(&mut self) {
        let edited = std::mem::take(&mut self.id_uncommitted);
        let state = self.field_mut(ProductField::Id);
        state.touched = true;
        state.dirty |= edited;
        self.check_id().await;
    }

    /// Runs the uniqueness check for the current id without touching it.
    pub async fn check_id(&mut self) -> IdAvailability {
        if let Some(ticket) = self.begin_id_check() {
            self.run_id_check(ticket).await;
        }
        self.id_availability
    }

    async fn run_id_check(&mut self, ticket: IdCheckTicket) {
        let taken = is_id_taken(&self.gateway, ticket.id()).await;
        self.apply_id_check(&ticket, taken);
    }

    /// Errors currently reported for `field`; disabled fields report none.
    pub fn field_errors(&self, field: ProductField) -> Vec<FieldError> {
        let state = self.field(field);
        if state.disabled {
            return Vec::new();
        }
        let mut errors = validate_field(field, &state.value, (self.today)());
        if field == ProductField::Id && self.id_availability == IdAvailability::Taken {
            errors.push(FieldError::IdTaken);
        }
        errors
    }

    pub fn is_valid(&self) -> bool {
        ProductField::ALL
            .into_iter()
            .all(|field| self.field_errors(field).is_empty())
    }

    /// Invalid and touched or modified; untouched invalid fields stay neutral.
    pub fn is_invalid(&self, field: ProductField) -> bool {
        let state = self.field(field);
        (state.touched || state.dirty) && !self.field_errors(field).is_empty()
    }

    fn mark_all_touched(&mut self) {
        for state in self.fields.values_mut() {
            state.touched = true;
        }
    }

    /// Current values, disabled fields included.
    pub fn raw_product(&self) -> Product {
        Product {
            id: self.value(ProductField::Id).to_string(),
            name: self.value(ProductField::Name).to_string(),
            description: self.value(ProductField::Description).to_string(),
            logo: self.value(ProductField::Logo).to_string(),
            date_release: self.value(ProductField::DateRelease).to_string(),
            date_revision: self.value(ProductField::DateRevision).to_string(),
        }
    }

    /// Validates and persists the record.
    ///
    /// Equivalent to [`Self::begin_submit`], [`SubmitRequest::send`] and
    /// [`Self::finish_submit`].
    pub async fn submit(&mut self) -> SubmitOutcome {
        let Some(request) = self.begin_submit() else {
            return SubmitOutcome::Invalid;
        };
        let result = request.send(&self.gateway).await;
        self.finish_submit(result)
    }

    /// Clears the previous error and validates.
    ///
    /// An invalid form marks every field touched and yields `None`. Otherwise
    /// the saving flag is set and the request to send is returned: an
    /// update of the edited id with the id-less payload in edit mode, the
    /// full record in create mode.
    pub fn begin_submit(&mut self) -> Option<SubmitRequest> {
        self.error = None;

        if !self.is_valid() {
            self.mark_all_touched();
            debug!("event=product_submit module=form status=invalid");
            return None;
        }

        let payload = self.raw_product();
        let request = match &self.mode {
            FormMode::Edit { id } => {
                let (_, update) = payload.into_update();
                SubmitRequest::Update {
                    id: id.clone(),
                    update,
                }
            }
            FormMode::Create => SubmitRequest::Create(payload),
        };
        self.saving = true;
        Some(request)
    }

    /// Applies the result of a sent [`SubmitRequest`] and clears the saving
    /// flag.
    ///
    /// On failure the error text lists backend violations one per line,
    /// else the backend message, else a fallback.
    pub fn finish_submit(&mut self, result: GatewayResult<()>) -> SubmitOutcome {
        self.saving = false;

        let (mode, fallback) = match self.mode {
            FormMode::Create => ("create", CREATE_FAILED_MESSAGE),
            FormMode::Edit { .. } => ("edit", UPDATE_FAILED_MESSAGE),
        };
        match result {
            Ok(()) => {
                info!(
                    "event=product_submit module=form mode={} status=ok id={}",
                    mode,
                    self.value(ProductField::Id)
                );
                SubmitOutcome::Saved(Navigation::to(Route::ProductList))
            }
            Err(err) => {
                warn!(
                    "event=product_submit module=form mode={} status=error error={}",
                    mode, err
                );
                self.error = Some(describe_submit_failure(&err, fallback));
                SubmitOutcome::Failed
            }
        }
    }

    /// Clears every field and the error.
    ///
    /// Create mode gets a fresh candidate id and returns the ticket of its
    /// uniqueness check, to be completed with [`Self::apply_id_check`];
    /// edit mode keeps the disabled id and returns `None`.
    pub fn reset(&mut self) -> Option<IdCheckTicket> {
        self.error = None;
        self.id_guard.invalidate();
        self.id_availability = IdAvailability::Unchecked;
        self.id_uncommitted = false;

        let keep_id = self.mode.edit_id().is_some();
        for (field, state) in self.fields.iter_mut() {
            if !(keep_id && *field == ProductField::Id) {
                state.value.clear();
            }
            state.touched = false;
            state.dirty = false;
        }

        if keep_id {
            return None;
        }
        self.field_mut(ProductField::Id).value = generate_candidate_id();
        self.begin_id_check()
    }

    /// [`Self::reset`] followed by the candidate id check.
    pub async fn reset_and_check(&mut self) {
        if let Some(ticket) = self.reset() {
            self.run_id_check(ticket).await;
        }
    }

    /// Synchronous render model.
    pub fn view(&self) -> FormView {
        let fields = ProductField::ALL
            .into_iter()
            .map(|field| {
                let state = self.field(field);
                FieldView {
                    field,
                    value: state.value.clone(),
                    disabled: state.disabled,
                    show_invalid: self.is_invalid(field),
                    errors: self
                        .field_errors(field)
                        .iter()
                        .map(ToString::to_string)
                        .collect(),
                }
            })
            .collect();

        FormView {
            mode: self.mode.clone(),
            fields,
            id_availability: self.id_availability,
            saving: self.saving,
            error: self.error.clone(),
            submittable: !self.saving && self.is_valid(),
        }
    }
}

/// Maps a create/update failure to user-facing text.
///
/// Violations render as `• {field}: {message}` lines; otherwise the backend
/// message is used, then `fallback`.
pub fn describe_submit_failure(err: &GatewayError, fallback: &str) -> String {
    let violations = err.violations();
    if !violations.is_empty() {
        return violations
            .iter()
            .map(|violation| format!("• {}: {}", violation.field, violation.message))
            .collect::<Vec<_>>()
            .join("\n");
    }
    err.backend_message().unwrap_or(fallback).to_string()
}

/// Random 8-char lowercase alphanumeric candidate id.
///
/// Uniqueness is not guaranteed; the blur check and the backend catch
/// collisions.
pub fn generate_candidate_id() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(GENERATED_ID_LEN)
        .collect()
}
