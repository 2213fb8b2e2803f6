mod common;

use catalog_core::state::form::{
    CREATE_FAILED_MESSAGE, LOAD_FAILED_MESSAGE, NOT_FOUND_MESSAGE,
};
use catalog_core::{
    FieldError, FieldViolation, FormMode, FormRequest, GatewayError, GatewayOp, IdAvailability,
    InMemoryProductsGateway, Navigation, ProductField, ProductFormState, Route, SubmitOutcome,
    SubmitRequest,
};
use common::{catalog, fixed_today};
use std::sync::Arc;

type Form = ProductFormState<Arc<InMemoryProductsGateway>>;

fn gateway() -> Arc<InMemoryProductsGateway> {
    Arc::new(InMemoryProductsGateway::with_products(catalog()))
}

async fn open(gateway: &Arc<InMemoryProductsGateway>, request: FormRequest) -> Form {
    ProductFormState::open_with_clock(Arc::clone(gateway), request, fixed_today).await
}

fn fill_valid(form: &mut Form) {
    form.set_value(ProductField::Name, "Tarjeta Platino");
    form.set_value(ProductField::Description, "Tarjeta para compras premium.");
    form.set_value(ProductField::Logo, "assets-7.png");
    form.set_value(ProductField::DateRelease, "2025-02-01");
}

#[tokio::test]
async fn create_mode_starts_with_generated_id_and_invalid_form() {
    let gateway = gateway();
    let form = open(&gateway, FormRequest::create()).await;

    assert_eq!(form.mode(), &FormMode::Create);
    let id = form.value(ProductField::Id);
    assert!((3..=10).contains(&id.chars().count()), "id was {id:?}");
    assert!(!form.field(ProductField::Id).disabled);
    assert_eq!(form.value(ProductField::DateRevision), "");
    assert!(!form.is_valid());
    assert_eq!(gateway.calls(GatewayOp::List), 0);
}

#[tokio::test]
async fn generated_id_is_checked_on_open_without_touching_it() {
    let gateway = gateway();
    let form = open(&gateway, FormRequest::create()).await;

    assert_eq!(gateway.calls(GatewayOp::VerifyId), 1);
    assert_eq!(form.id_availability(), IdAvailability::Available);
    assert!(!form.field(ProductField::Id).touched);
    assert!(!form.field(ProductField::Id).dirty);
}

#[tokio::test]
async fn release_date_drives_revision_date() {
    let gateway = gateway();
    let mut form = open(&gateway, FormRequest::create()).await;

    form.set_value(ProductField::DateRelease, "2025-01-20");
    assert_eq!(form.value(ProductField::DateRevision), "2026-01-20");

    form.set_value(ProductField::DateRelease, "");
    assert_eq!(form.value(ProductField::DateRevision), "");
    assert!(form.field_errors(ProductField::DateRevision).is_empty());

    form.set_value(ProductField::DateRelease, "2028-02-29");
    assert_eq!(form.value(ProductField::DateRevision), "2029-03-01");
}

#[tokio::test]
async fn revision_date_is_not_directly_editable() {
    let gateway = gateway();
    let mut form = open(&gateway, FormRequest::create()).await;

    assert!(!form.set_value(ProductField::DateRevision, "2099-01-01"));
    assert_eq!(form.value(ProductField::DateRevision), "");
}

#[tokio::test]
async fn edit_mode_missing_record_sets_not_found() {
    let gateway = Arc::new(InMemoryProductsGateway::new());
    let form = open(&gateway, FormRequest::edit("test-id")).await;

    assert_eq!(form.error(), Some(NOT_FOUND_MESSAGE));
    assert_eq!(form.value(ProductField::Name), "");
    assert!(form.field(ProductField::Id).disabled);
    assert_eq!(gateway.calls(GatewayOp::List), 1);
}

#[tokio::test]
async fn edit_mode_fetch_failure_sets_load_error() {
    let gateway = gateway();
    gateway.fail(GatewayOp::List, GatewayError::Transport("refused".to_string()));

    let form = open(&gateway, FormRequest::edit("uno")).await;

    assert_eq!(form.error(), Some(LOAD_FAILED_MESSAGE));
}

#[tokio::test]
async fn edit_mode_with_passed_record_skips_fetch() {
    let gateway = gateway();
    let record = catalog()[1].clone();

    let form = open(&gateway, FormRequest::from(Navigation::edit(record.clone()))).await;

    assert_eq!(gateway.calls(GatewayOp::List), 0);
    assert_eq!(form.mode().edit_id(), Some("dos"));
    assert_eq!(form.raw_product(), record);
    assert!(form.field(ProductField::Id).disabled);
    assert_eq!(form.error(), None);
}

#[tokio::test]
async fn edit_mode_with_mismatched_record_falls_back_to_fetch() {
    let gateway = gateway();
    let request = FormRequest {
        edit_id: Some("tres".to_string()),
        product: Some(catalog()[0].clone()),
    };

    let form = open(&gateway, request).await;

    assert_eq!(gateway.calls(GatewayOp::List), 1);
    assert_eq!(form.value(ProductField::Id), "tres");
    assert_eq!(form.value(ProductField::Name), "Crédito Libre Inversión");
}

#[tokio::test]
async fn invalid_submit_touches_every_field_and_skips_gateway() {
    let gateway = gateway();
    let mut form = open(&gateway, FormRequest::create()).await;
    form.set_value(ProductField::Name, "short");

    let outcome = form.submit().await;

    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert_eq!(gateway.calls(GatewayOp::Create), 0);
    assert_eq!(gateway.calls(GatewayOp::Update), 0);
    for field in ProductField::ALL {
        assert!(form.field(field).touched, "{field} should be touched");
    }
    assert!(form.is_invalid(ProductField::Name));
    assert!(form.is_invalid(ProductField::Logo));
}

#[tokio::test]
async fn untouched_invalid_fields_render_neutral() {
    let gateway = gateway();
    let mut form = open(&gateway, FormRequest::create()).await;

    assert!(!form.is_invalid(ProductField::Name));
    assert_eq!(
        form.field_errors(ProductField::Name),
        vec![FieldError::Required]
    );

    form.set_value(ProductField::Name, "abc");
    assert!(form.is_invalid(ProductField::Name));

    form.touch(ProductField::Logo);
    assert!(form.is_invalid(ProductField::Logo));
}

#[tokio::test]
async fn release_date_before_today_blocks_submit() {
    let gateway = gateway();
    let mut form = open(&gateway, FormRequest::create()).await;
    fill_valid(&mut form);
    form.set_value(ProductField::DateRelease, "2025-01-14");

    assert_eq!(
        form.field_errors(ProductField::DateRelease),
        vec![FieldError::BeforeToday {
            today: fixed_today()
        }]
    );
    assert_eq!(form.submit().await, SubmitOutcome::Invalid);
}

#[tokio::test]
async fn create_submit_persists_full_payload_and_navigates_to_list() {
    let gateway = gateway();
    let mut form = open(&gateway, FormRequest::create()).await;
    form.set_value(ProductField::Id, "nuevo");
    fill_valid(&mut form);
    assert!(form.view().submittable);

    let outcome = form.submit().await;

    assert_eq!(outcome, SubmitOutcome::Saved(Navigation::to(Route::ProductList)));
    assert!(!form.is_saving());
    let stored = gateway.products();
    let created = stored.last().expect("created product stored");
    assert_eq!(created.id, "nuevo");
    assert_eq!(created.date_revision, "2026-02-01");
}

#[tokio::test]
async fn edit_submit_updates_by_route_id() {
    let gateway = gateway();
    let mut form = open(&gateway, FormRequest::edit("uno")).await;
    form.set_value(ProductField::DateRelease, "2025-03-10");
    form.set_value(ProductField::Name, "Tarjeta Crédito Oro");

    let outcome = form.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Saved(_)));
    assert_eq!(gateway.calls(GatewayOp::Update), 1);
    assert_eq!(gateway.calls(GatewayOp::Create), 0);
    let updated = gateway
        .products()
        .into_iter()
        .find(|p| p.id == "uno")
        .expect("edited product still present");
    assert_eq!(updated.name, "Tarjeta Crédito Oro");
    assert_eq!(updated.date_revision, "2026-03-10");
}

#[tokio::test]
async fn submit_failure_lists_backend_violations() {
    let gateway = gateway();
    gateway.fail(
        GatewayOp::Create,
        GatewayError::rejected_with(vec![
            FieldViolation::new("name", "name must be unique"),
            FieldViolation::new("logo", "logo must be a URL"),
        ]),
    );
    let mut form = open(&gateway, FormRequest::create()).await;
    fill_valid(&mut form);

    let outcome = form.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(
        form.error(),
        Some("• name: name must be unique\n• logo: logo must be a URL")
    );
    assert!(!form.is_saving());
}

#[tokio::test]
async fn submit_failure_without_detail_uses_fallback() {
    let gateway = gateway();
    gateway.fail(
        GatewayOp::Create,
        GatewayError::Transport("connection reset".to_string()),
    );
    let mut form = open(&gateway, FormRequest::create()).await;
    fill_valid(&mut form);

    assert_eq!(form.submit().await, SubmitOutcome::Failed);
    assert_eq!(form.error(), Some(CREATE_FAILED_MESSAGE));

    gateway.clear_failures();
    assert!(matches!(form.submit().await, SubmitOutcome::Saved(_)));
    assert_eq!(form.error(), None);
}

#[tokio::test]
async fn blur_marks_taken_id_invalid() {
    let gateway = gateway();
    let mut form = open(&gateway, FormRequest::create()).await;
    fill_valid(&mut form);
    form.set_value(ProductField::Id, "dos");

    form.blur_id().await;

    assert_eq!(form.id_availability(), IdAvailability::Taken);
    assert!(form.field_errors(ProductField::Id).contains(&FieldError::IdTaken));
    assert!(form.is_invalid(ProductField::Id));
    assert_eq!(form.submit().await, SubmitOutcome::Invalid);
    assert_eq!(gateway.calls(GatewayOp::Create), 0);
}

#[tokio::test]
async fn blur_with_failing_verification_counts_as_available() {
    let gateway = gateway();
    gateway.fail(GatewayOp::VerifyId, GatewayError::Transport("down".to_string()));
    let mut form = open(&gateway, FormRequest::create()).await;

    form.blur_id().await;

    assert_eq!(form.id_availability(), IdAvailability::Available);
    assert!(form.field(ProductField::Id).touched);
}

#[tokio::test]
async fn blur_skips_empty_id() {
    let gateway = gateway();
    let mut form = open(&gateway, FormRequest::create()).await;
    let checks_on_open = gateway.calls(GatewayOp::VerifyId);
    form.set_value(ProductField::Id, "");

    form.blur_id().await;

    assert_eq!(gateway.calls(GatewayOp::VerifyId), checks_on_open);
    assert_eq!(form.id_availability(), IdAvailability::Unchecked);
    assert_eq!(form.field_errors(ProductField::Id), vec![FieldError::Required]);
}

#[tokio::test]
async fn typed_id_counts_as_modified_only_after_blur() {
    let gateway = gateway();
    let mut form = open(&gateway, FormRequest::create()).await;

    form.set_value(ProductField::Id, "ab");
    assert!(!form.field(ProductField::Id).dirty);
    assert!(!form.is_invalid(ProductField::Id));
    assert_eq!(
        form.field_errors(ProductField::Id),
        vec![FieldError::MinLength { min: 3, actual: 2 }]
    );

    form.blur_id().await;
    assert!(form.field(ProductField::Id).dirty);
    assert!(form.field(ProductField::Id).touched);
    assert!(form.is_invalid(ProductField::Id));

    form.set_value(ProductField::Name, "Cuenta Nómina");
    assert!(form.field(ProductField::Name).dirty);
}

#[tokio::test]
async fn stale_id_check_result_is_discarded() {
    let gateway = gateway();
    let mut form = open(&gateway, FormRequest::create()).await;
    form.set_value(ProductField::Id, "uno");

    let stale = form.begin_id_check().expect("non-empty id issues a ticket");
    assert_eq!(form.id_availability(), IdAvailability::Pending);
    form.set_value(ProductField::Id, "unico");

    assert!(!form.apply_id_check(&stale, true));
    assert_eq!(form.id_availability(), IdAvailability::Unchecked);

    let fresh = form.begin_id_check().expect("ticket for new value");
    let superseding = form.begin_id_check().expect("second blur");
    assert!(!form.apply_id_check(&fresh, true));
    assert!(form.apply_id_check(&superseding, false));
    assert_eq!(form.id_availability(), IdAvailability::Available);
}

#[tokio::test]
async fn edit_mode_never_checks_or_edits_id() {
    let gateway = gateway();
    let mut form = open(&gateway, FormRequest::edit("uno")).await;

    assert!(!form.set_value(ProductField::Id, "otro"));
    form.blur_id().await;

    assert_eq!(form.value(ProductField::Id), "uno");
    assert_eq!(gateway.calls(GatewayOp::VerifyId), 0);
}

#[tokio::test]
async fn reset_in_create_mode_regenerates_and_checks_id() {
    let gateway = gateway();
    let mut form = open(&gateway, FormRequest::create()).await;
    fill_valid(&mut form);
    form.set_value(ProductField::Id, "mine");

    form.reset_and_check().await;

    let id = form.value(ProductField::Id);
    assert_ne!(id, "mine");
    assert_eq!(id.chars().count(), 8);
    assert_eq!(form.value(ProductField::Name), "");
    assert_eq!(form.value(ProductField::DateRevision), "");
    assert!(!form.field(ProductField::Name).dirty);
    assert_eq!(form.error(), None);
    assert_eq!(gateway.calls(GatewayOp::VerifyId), 2);
    assert_eq!(form.id_availability(), IdAvailability::Available);
}

#[tokio::test]
async fn reset_hands_out_check_for_new_candidate() {
    let gateway = gateway();
    let mut form = open(&gateway, FormRequest::create()).await;

    let ticket = form.reset().expect("create mode checks the new candidate");
    assert_eq!(ticket.id(), form.value(ProductField::Id));
    assert_eq!(form.id_availability(), IdAvailability::Pending);

    assert!(form.apply_id_check(&ticket, true));
    assert_eq!(form.id_availability(), IdAvailability::Taken);
    assert!(form.field_errors(ProductField::Id).contains(&FieldError::IdTaken));
    assert!(!form.is_valid());
}

#[tokio::test]
async fn reset_in_edit_mode_keeps_disabled_id() {
    let gateway = gateway();
    let mut form = open(&gateway, FormRequest::edit("cinco")).await;

    assert!(form.reset().is_none());

    assert_eq!(form.value(ProductField::Id), "cinco");
    assert!(form.field(ProductField::Id).disabled);
    assert_eq!(form.value(ProductField::Name), "");
    assert_eq!(form.value(ProductField::DateRelease), "");
    assert_eq!(gateway.calls(GatewayOp::VerifyId), 0);
}

#[tokio::test]
async fn saving_flag_is_visible_while_submit_is_in_flight() {
    let gateway = gateway();
    let mut form = open(&gateway, FormRequest::edit("uno")).await;
    form.set_value(ProductField::DateRelease, "2025-03-10");

    let request = form.begin_submit().expect("valid form yields a request");
    assert!(matches!(
        &request,
        SubmitRequest::Update { id, .. } if id == "uno"
    ));
    let in_flight = form.view();
    assert!(in_flight.saving);
    assert!(!in_flight.submittable);
    assert!(form.is_saving());

    let result = request.send(form.gateway().as_ref()).await;
    let outcome = form.finish_submit(result);

    assert_eq!(outcome, SubmitOutcome::Saved(Navigation::to(Route::ProductList)));
    assert!(!form.view().saving);
    assert!(form.view().submittable);
    assert_eq!(gateway.calls(GatewayOp::Update), 1);
}

#[tokio::test]
async fn invalid_form_yields_no_submit_request() {
    let gateway = gateway();
    let mut form = open(&gateway, FormRequest::create()).await;

    assert_eq!(form.begin_submit(), None);
    assert!(!form.is_saving());
    assert!(form.field(ProductField::Name).touched);
}

#[tokio::test]
async fn view_exposes_field_render_state() {
    let gateway = gateway();
    let mut form = open(&gateway, FormRequest::create()).await;
    form.set_value(ProductField::Name, "abc");

    let view = form.view();

    assert_eq!(view.fields.len(), 6);
    let name = &view.fields[1];
    assert_eq!(name.field, ProductField::Name);
    assert!(name.show_invalid);
    assert_eq!(name.errors, vec!["must be at least 6 characters (got 3)"]);
    let revision = &view.fields[5];
    assert!(revision.disabled);
    assert!(!revision.show_invalid);
    assert!(!view.submittable);
}
