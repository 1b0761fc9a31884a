//! Payment link tools.
//!
//! Customer and notification details are accepted as flat arguments and
//! nested into the `customer` and `notify` objects the API expects.

use crate::{amount_param, currency_param, id_param, notes_param, respond};
use paymcp_mcp::{Arguments, CallToolResult, ParamSpec, ParamValidator, RequestScope, Tool, Toolset};
use serde_json::Value;

pub fn toolset() -> Toolset {
    Toolset::new("payment_links", "Create and fetch payment links")
        .add_read_tools([fetch_payment_link(), fetch_all_payment_links()])
        .add_write_tools([create_payment_link()])
}

fn create_payment_link() -> Tool {
    Tool::new(
        "create_payment_link",
        "Create a payment link the customer can pay through",
        vec![
            amount_param(true),
            currency_param(),
            ParamSpec::string("description").description("What the payment is for"),
            ParamSpec::string("reference_id")
                .description("Your reference id for this link (must be unique)"),
            ParamSpec::boolean("accept_partial").description("Allow partial payments"),
            ParamSpec::integer("first_min_partial_amount")
                .description("Minimum amount of the first partial payment, in sub-units")
                .minimum(100),
            ParamSpec::integer("expire_by")
                .description("Unix timestamp (seconds) after which the link expires"),
            ParamSpec::string("customer_name").description("Customer name"),
            ParamSpec::string("customer_email").description("Customer email address"),
            ParamSpec::string("customer_contact").description("Customer phone number"),
            ParamSpec::boolean("notify_sms").description("Send the link to the customer by SMS"),
            ParamSpec::boolean("notify_email")
                .description("Send the link to the customer by email"),
            ParamSpec::boolean("reminder_enable").description("Send payment reminders"),
            ParamSpec::string("callback_url")
                .description("URL the customer is redirected to after payment"),
            ParamSpec::string("callback_method")
                .description("HTTP method for the callback redirect")
                .one_of(["get"]),
            notes_param(false),
        ],
        handle_create_payment_link,
    )
    .with_title("Create payment link")
}

async fn handle_create_payment_link(scope: RequestScope, args: Arguments) -> CallToolResult {
    let mut body = Arguments::new();
    let mut customer = Arguments::new();
    let mut notify = Arguments::new();

    let mut v = ParamValidator::new(&args);
    v.required_int(&mut body, "amount")
        .required_string(&mut body, "currency")
        .optional_string(&mut body, "description")
        .optional_string(&mut body, "reference_id")
        .optional_bool(&mut body, "accept_partial")
        .optional_int(&mut body, "first_min_partial_amount")
        .optional_int(&mut body, "expire_by")
        .optional_string_to(&mut customer, "customer_name", "name")
        .optional_string_to(&mut customer, "customer_email", "email")
        .optional_string_to(&mut customer, "customer_contact", "contact")
        .optional_bool_to(&mut notify, "notify_sms", "sms")
        .optional_bool_to(&mut notify, "notify_email", "email")
        .optional_bool(&mut body, "reminder_enable")
        .optional_string(&mut body, "callback_url")
        .optional_string(&mut body, "callback_method")
        .optional_map(&mut body, "notes");
    if let Err(errors) = v.finish() {
        return errors.into();
    }

    if !customer.is_empty() {
        body.insert("customer".to_string(), Value::Object(customer));
    }
    if !notify.is_empty() {
        body.insert("notify".to_string(), Value::Object(notify));
    }

    let result = scope.client().post("/payment_links", &body).await;
    respond("creating payment link", result)
}

fn fetch_payment_link() -> Tool {
    Tool::new(
        "fetch_payment_link",
        "Fetch a payment link by its id",
        vec![id_param(
            "payment_link_id",
            "Unique identifier of the payment link, e.g. plink_ExjpAUN3gVHrPJ",
        )],
        handle_fetch_payment_link,
    )
    .with_title("Fetch payment link")
}

async fn handle_fetch_payment_link(scope: RequestScope, args: Arguments) -> CallToolResult {
    let mut v = ParamValidator::new(&args);
    let id = v.path_segment("payment_link_id");
    if let Err(errors) = v.finish() {
        return errors.into();
    }
    let id = id.unwrap_or_default();

    let result = scope
        .client()
        .get(&format!("/payment_links/{id}"), &Arguments::new())
        .await;
    respond("fetching payment link", result)
}

fn fetch_all_payment_links() -> Tool {
    Tool::new(
        "fetch_all_payment_links",
        "List payment links, optionally filtered by payment or reference id",
        vec![
            ParamSpec::string("payment_id").description("Only links paid by this payment"),
            ParamSpec::string("reference_id").description("Only links with this reference id"),
        ],
        handle_fetch_all_payment_links,
    )
    .with_title("Fetch all payment links")
}

async fn handle_fetch_all_payment_links(scope: RequestScope, args: Arguments) -> CallToolResult {
    let mut query = Arguments::new();
    let mut v = ParamValidator::new(&args);
    v.optional_string(&mut query, "payment_id")
        .optional_string(&mut query, "reference_id");
    if let Err(errors) = v.finish() {
        return errors.into();
    }

    let result = scope.client().get("/payment_links", &query).await;
    respond("fetching payment links", result)
}
