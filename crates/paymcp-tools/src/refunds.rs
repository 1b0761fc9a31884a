//! Refund tools.

use crate::{amount_param, id_param, notes_param, pagination_params, respond, time_range_params};
use paymcp_mcp::{Arguments, CallToolResult, ParamSpec, ParamValidator, RequestScope, Tool, Toolset};

pub fn toolset() -> Toolset {
    Toolset::new("refunds", "Create, fetch and update refunds")
        .add_read_tools([
            fetch_refund(),
            fetch_all_refunds(),
            fetch_multiple_refunds_for_payment(),
        ])
        .add_write_tools([create_refund(), update_refund()])
}

fn payment_id() -> ParamSpec {
    id_param("payment_id", "Unique identifier of the payment to refund")
}

fn refund_id() -> ParamSpec {
    id_param("refund_id", "Unique identifier of the refund, e.g. rfnd_FP8QHiV938haTz")
}

fn create_refund() -> Tool {
    Tool::new(
        "create_refund",
        "Refund a captured payment in full or in part",
        vec![
            payment_id(),
            amount_param(false),
            ParamSpec::string("speed")
                .description("Refund speed")
                .one_of(["normal", "optimum"]),
            ParamSpec::string("receipt").description("Your receipt id for this refund"),
            notes_param(false),
        ],
        handle_create_refund,
    )
    .with_title("Create refund")
}

async fn handle_create_refund(scope: RequestScope, args: Arguments) -> CallToolResult {
    let mut body = Arguments::new();
    let mut v = ParamValidator::new(&args);
    let id = v.path_segment("payment_id");
    v.optional_int(&mut body, "amount")
        .optional_string(&mut body, "speed")
        .optional_string(&mut body, "receipt")
        .optional_map(&mut body, "notes");
    if let Err(errors) = v.finish() {
        return errors.into();
    }
    let id = id.unwrap_or_default();

    let result = scope
        .client()
        .post(&format!("/payments/{id}/refund"), &body)
        .await;
    respond("creating refund", result)
}

fn fetch_refund() -> Tool {
    Tool::new(
        "fetch_refund",
        "Fetch a refund by its id",
        vec![refund_id()],
        handle_fetch_refund,
    )
    .with_title("Fetch refund")
}

async fn handle_fetch_refund(scope: RequestScope, args: Arguments) -> CallToolResult {
    let mut v = ParamValidator::new(&args);
    let id = v.path_segment("refund_id");
    if let Err(errors) = v.finish() {
        return errors.into();
    }
    let id = id.unwrap_or_default();

    let result = scope
        .client()
        .get(&format!("/refunds/{id}"), &Arguments::new())
        .await;
    respond("fetching refund", result)
}

fn fetch_all_refunds() -> Tool {
    let mut params = Vec::from(pagination_params());
    params.extend(time_range_params());

    Tool::new(
        "fetch_all_refunds",
        "List refunds across all payments",
        params,
        handle_fetch_all_refunds,
    )
    .with_title("Fetch all refunds")
}

async fn handle_fetch_all_refunds(scope: RequestScope, args: Arguments) -> CallToolResult {
    let mut query = Arguments::new();
    let mut v = ParamValidator::new(&args);
    v.pagination(&mut query)
        .optional_int(&mut query, "from")
        .optional_int(&mut query, "to");
    if let Err(errors) = v.finish() {
        return errors.into();
    }

    let result = scope.client().get("/refunds", &query).await;
    respond("fetching refunds", result)
}

fn fetch_multiple_refunds_for_payment() -> Tool {
    let mut params = vec![payment_id()];
    params.extend(pagination_params());
    params.extend(time_range_params());

    Tool::new(
        "fetch_multiple_refunds_for_payment",
        "List the refunds made against one payment",
        params,
        handle_fetch_multiple_refunds_for_payment,
    )
    .with_title("Fetch refunds for payment")
}

async fn handle_fetch_multiple_refunds_for_payment(
    scope: RequestScope,
    args: Arguments,
) -> CallToolResult {
    let mut query = Arguments::new();
    let mut v = ParamValidator::new(&args);
    let id = v.path_segment("payment_id");
    v.pagination(&mut query)
        .optional_int(&mut query, "from")
        .optional_int(&mut query, "to");
    if let Err(errors) = v.finish() {
        return errors.into();
    }
    let id = id.unwrap_or_default();

    let result = scope
        .client()
        .get(&format!("/payments/{id}/refunds"), &query)
        .await;
    respond("fetching payment refunds", result)
}

fn update_refund() -> Tool {
    Tool::new(
        "update_refund",
        "Replace the notes attached to a refund",
        vec![refund_id(), notes_param(true)],
        handle_update_refund,
    )
    .with_title("Update refund")
}

async fn handle_update_refund(scope: RequestScope, args: Arguments) -> CallToolResult {
    let mut body = Arguments::new();
    let mut v = ParamValidator::new(&args);
    let id = v.path_segment("refund_id");
    v.required_map(&mut body, "notes");
    if let Err(errors) = v.finish() {
        return errors.into();
    }
    let id = id.unwrap_or_default();

    let result = scope.client().patch(&format!("/refunds/{id}"), &body).await;
    respond("updating refund", result)
}
