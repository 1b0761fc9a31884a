//! Order tools.

use crate::{amount_param, currency_param, id_param, notes_param, pagination_params, respond, time_range_params};
use paymcp_mcp::{Arguments, CallToolResult, ParamSpec, ParamValidator, RequestScope, Tool, Toolset};

pub fn toolset() -> Toolset {
    Toolset::new("orders", "Create, fetch and update orders")
        .add_read_tools([fetch_order(), fetch_all_orders(), fetch_order_payments()])
        .add_write_tools([create_order(), update_order()])
}

fn order_id() -> ParamSpec {
    id_param("order_id", "Unique identifier of the order, e.g. order_EKwxwAgItmmXdp")
}

fn create_order() -> Tool {
    Tool::new(
        "create_order",
        "Create an order that payments can be made against",
        vec![
            amount_param(true),
            currency_param(),
            ParamSpec::string("receipt")
                .description("Your receipt id for this order (max 40 characters)"),
            notes_param(false),
            ParamSpec::boolean("partial_payment")
                .description("Whether the customer may pay the order in parts"),
            ParamSpec::integer("first_payment_min_amount")
                .description("Minimum amount of the first partial payment, in sub-units")
                .minimum(100),
        ],
        handle_create_order,
    )
    .with_title("Create order")
}

async fn handle_create_order(scope: RequestScope, args: Arguments) -> CallToolResult {
    let mut body = Arguments::new();
    let mut v = ParamValidator::new(&args);
    v.required_int(&mut body, "amount")
        .required_string(&mut body, "currency")
        .optional_string(&mut body, "receipt")
        .optional_map(&mut body, "notes")
        .optional_bool(&mut body, "partial_payment")
        .optional_int(&mut body, "first_payment_min_amount");
    if let Err(errors) = v.finish() {
        return errors.into();
    }

    let result = scope.client().post("/orders", &body).await;
    respond("creating order", result)
}

fn fetch_order() -> Tool {
    Tool::new(
        "fetch_order",
        "Fetch an order by its id",
        vec![order_id()],
        handle_fetch_order,
    )
    .with_title("Fetch order")
}

async fn handle_fetch_order(scope: RequestScope, args: Arguments) -> CallToolResult {
    let mut v = ParamValidator::new(&args);
    let id = v.path_segment("order_id");
    if let Err(errors) = v.finish() {
        return errors.into();
    }
    let id = id.unwrap_or_default();

    let result = scope
        .client()
        .get(&format!("/orders/{id}"), &Arguments::new())
        .await;
    respond("fetching order", result)
}

fn fetch_all_orders() -> Tool {
    let mut params = Vec::from(pagination_params());
    params.extend(time_range_params());
    params.extend([
        ParamSpec::boolean("authorized")
            .description("Only orders with at least one authorized payment"),
        ParamSpec::string("receipt").description("Only orders with this receipt"),
        ParamSpec::string_array("expand")
            .description("Related entities to expand: payments, payments.card, transfers, virtual_account"),
    ]);

    Tool::new(
        "fetch_all_orders",
        "List orders, newest first, with optional filters",
        params,
        handle_fetch_all_orders,
    )
    .with_title("Fetch all orders")
}

async fn handle_fetch_all_orders(scope: RequestScope, args: Arguments) -> CallToolResult {
    let mut query = Arguments::new();
    let mut v = ParamValidator::new(&args);
    v.pagination(&mut query)
        .optional_int(&mut query, "from")
        .optional_int(&mut query, "to")
        .optional_bool(&mut query, "authorized")
        .optional_string(&mut query, "receipt")
        .expand(&mut query);
    if let Err(errors) = v.finish() {
        return errors.into();
    }

    let result = scope.client().get("/orders", &query).await;
    respond("fetching orders", result)
}

fn fetch_order_payments() -> Tool {
    Tool::new(
        "fetch_order_payments",
        "List every payment made against an order",
        vec![order_id()],
        handle_fetch_order_payments,
    )
    .with_title("Fetch order payments")
}

async fn handle_fetch_order_payments(scope: RequestScope, args: Arguments) -> CallToolResult {
    let mut v = ParamValidator::new(&args);
    let id = v.path_segment("order_id");
    if let Err(errors) = v.finish() {
        return errors.into();
    }
    let id = id.unwrap_or_default();

    let result = scope
        .client()
        .get(&format!("/orders/{id}/payments"), &Arguments::new())
        .await;
    respond("fetching order payments", result)
}

fn update_order() -> Tool {
    Tool::new(
        "update_order",
        "Replace the notes attached to an order",
        vec![order_id(), notes_param(true)],
        handle_update_order,
    )
    .with_title("Update order")
}

async fn handle_update_order(scope: RequestScope, args: Arguments) -> CallToolResult {
    let mut body = Arguments::new();
    let mut v = ParamValidator::new(&args);
    let id = v.path_segment("order_id");
    v.required_map(&mut body, "notes");
    if let Err(errors) = v.finish() {
        return errors.into();
    }
    let id = id.unwrap_or_default();

    let result = scope.client().patch(&format!("/orders/{id}"), &body).await;
    respond("updating order", result)
}
