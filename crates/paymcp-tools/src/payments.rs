//! Payment tools.

use crate::{amount_param, currency_param, id_param, notes_param, pagination_params, respond, time_range_params};
use paymcp_mcp::{Arguments, CallToolResult, ParamValidator, RequestScope, Tool, Toolset};

pub fn toolset() -> Toolset {
    Toolset::new("payments", "Fetch, capture and update payments")
        .add_read_tools([fetch_payment(), fetch_all_payments(), fetch_payment_card_details()])
        .add_write_tools([capture_payment(), update_payment()])
}

fn payment_id() -> paymcp_mcp::ParamSpec {
    id_param("payment_id", "Unique identifier of the payment, e.g. pay_29QQoUBi66xm2f")
}

fn fetch_payment() -> Tool {
    Tool::new(
        "fetch_payment",
        "Fetch a payment by its id",
        vec![payment_id()],
        handle_fetch_payment,
    )
    .with_title("Fetch payment")
}

async fn handle_fetch_payment(scope: RequestScope, args: Arguments) -> CallToolResult {
    let mut v = ParamValidator::new(&args);
    let id = v.path_segment("payment_id");
    if let Err(errors) = v.finish() {
        return errors.into();
    }
    let id = id.unwrap_or_default();

    let result = scope
        .client()
        .get(&format!("/payments/{id}"), &Arguments::new())
        .await;
    respond("fetching payment", result)
}

fn fetch_all_payments() -> Tool {
    let mut params = Vec::from(pagination_params());
    params.extend(time_range_params());

    Tool::new(
        "fetch_all_payments",
        "List payments, newest first, with optional pagination and time range",
        params,
        handle_fetch_all_payments,
    )
    .with_title("Fetch all payments")
}

async fn handle_fetch_all_payments(scope: RequestScope, args: Arguments) -> CallToolResult {
    let mut query = Arguments::new();
    let mut v = ParamValidator::new(&args);
    v.pagination(&mut query)
        .optional_int(&mut query, "from")
        .optional_int(&mut query, "to");
    if let Err(errors) = v.finish() {
        return errors.into();
    }

    let result = scope.client().get("/payments", &query).await;
    respond("fetching payments", result)
}

fn fetch_payment_card_details() -> Tool {
    Tool::new(
        "fetch_payment_card_details",
        "Fetch the card details used for a card payment",
        vec![payment_id()],
        handle_fetch_payment_card_details,
    )
    .with_title("Fetch payment card details")
}

async fn handle_fetch_payment_card_details(scope: RequestScope, args: Arguments) -> CallToolResult {
    let mut v = ParamValidator::new(&args);
    let id = v.path_segment("payment_id");
    if let Err(errors) = v.finish() {
        return errors.into();
    }
    let id = id.unwrap_or_default();

    let result = scope
        .client()
        .get(&format!("/payments/{id}/card"), &Arguments::new())
        .await;
    respond("fetching card details", result)
}

fn capture_payment() -> Tool {
    Tool::new(
        "capture_payment",
        "Capture an authorized payment. The amount must match the authorized amount.",
        vec![payment_id(), amount_param(true), currency_param()],
        handle_capture_payment,
    )
    .with_title("Capture payment")
}

async fn handle_capture_payment(scope: RequestScope, args: Arguments) -> CallToolResult {
    let mut body = Arguments::new();
    let mut v = ParamValidator::new(&args);
    let id = v.path_segment("payment_id");
    v.required_int(&mut body, "amount")
        .required_string(&mut body, "currency");
    if let Err(errors) = v.finish() {
        return errors.into();
    }
    let id = id.unwrap_or_default();

    let result = scope
        .client()
        .post(&format!("/payments/{id}/capture"), &body)
        .await;
    respond("capturing payment", result)
}

fn update_payment() -> Tool {
    Tool::new(
        "update_payment",
        "Replace the notes attached to a payment",
        vec![payment_id(), notes_param(true)],
        handle_update_payment,
    )
    .with_title("Update payment")
}

async fn handle_update_payment(scope: RequestScope, args: Arguments) -> CallToolResult {
    let mut body = Arguments::new();
    let mut v = ParamValidator::new(&args);
    let id = v.path_segment("payment_id");
    v.required_map(&mut body, "notes");
    if let Err(errors) = v.finish() {
        return errors.into();
    }
    let id = id.unwrap_or_default();

    let result = scope.client().patch(&format!("/payments/{id}"), &body).await;
    respond("updating payment", result)
}
