//! # paymcp-tools
//!
//! The payment API tools served by paymcp, grouped into toolsets:
//!
//! | Toolset | Read tools | Write tools |
//! |---------|------------|-------------|
//! | `payments` | `fetch_payment`, `fetch_all_payments`, `fetch_payment_card_details` | `capture_payment`, `update_payment` |
//! | `orders` | `fetch_order`, `fetch_all_orders`, `fetch_order_payments` | `create_order`, `update_order` |
//! | `refunds` | `fetch_refund`, `fetch_all_refunds`, `fetch_multiple_refunds_for_payment` | `create_refund`, `update_refund` |
//! | `payment_links` | `fetch_payment_link`, `fetch_all_payment_links` | `create_payment_link` |
//!
//! Every handler validates its arguments first and only calls the backend
//! when validation passed. Backend failures come back as tool errors of the
//! form `"<operation> failed: <message>"`.

pub mod orders;
pub mod payment_links;
pub mod payments;
pub mod refunds;

use paymcp_client::ClientError;
use paymcp_mcp::{CallToolResult, ParamSpec, ToolRegistry, ToolsetError, ToolsetGroup};
use serde_json::Value;

/// Every known toolset, none enabled yet.
pub fn build_toolsets(read_only: bool) -> Result<ToolsetGroup, ToolsetError> {
    let mut group = ToolsetGroup::new(read_only);
    group.add_toolset(payments::toolset())?;
    group.add_toolset(orders::toolset())?;
    group.add_toolset(refunds::toolset())?;
    group.add_toolset(payment_links::toolset())?;
    Ok(group)
}

/// Build the registry a server exposes.
///
/// An empty `enabled` list enables every toolset. Unknown names fail the
/// whole call.
pub fn build_registry<S: AsRef<str>>(enabled: &[S], read_only: bool) -> Result<ToolRegistry, ToolsetError> {
    let mut group = build_toolsets(read_only)?;
    group.enable_toolsets(enabled)?;

    let mut registry = ToolRegistry::new();
    let count = group.register_tools(&mut registry)?;
    tracing::info!(
        tools = count,
        toolsets = ?group.enabled_names(),
        read_only,
        "Registered tools"
    );
    Ok(registry)
}

/// Turn a backend outcome into a tool result.
pub(crate) fn respond(operation: &str, result: Result<Value, ClientError>) -> CallToolResult {
    match result {
        Ok(value) => CallToolResult::json(&value),
        Err(e) => {
            tracing::debug!(operation, error = %e, "Backend call failed");
            CallToolResult::error(format!("{operation} failed: {e}"))
        }
    }
}

pub(crate) fn id_param(name: &str, description: &str) -> ParamSpec {
    ParamSpec::string(name).required().description(description)
}

/// Free-form key/value notes. The API accepts at most 15 keys.
pub(crate) fn notes_param(required: bool) -> ParamSpec {
    let param = ParamSpec::object("notes")
        .description("Key-value pairs for additional information (max 15 pairs, 256 chars each)")
        .max_properties(15);
    if required { param.required() } else { param }
}

pub(crate) fn pagination_params() -> [ParamSpec; 2] {
    [
        ParamSpec::integer("count")
            .description("Number of items to fetch (default 10, max 100)")
            .minimum(1)
            .maximum(100),
        ParamSpec::integer("skip")
            .description("Number of items to skip (default 0)")
            .minimum(0),
    ]
}

pub(crate) fn time_range_params() -> [ParamSpec; 2] {
    [
        ParamSpec::integer("from")
            .description("Unix timestamp (seconds) from when items are fetched")
            .minimum(946684800),
        ParamSpec::integer("to")
            .description("Unix timestamp (seconds) up to when items are fetched")
            .minimum(946684800),
    ]
}

pub(crate) fn amount_param(required: bool) -> ParamSpec {
    let param = ParamSpec::integer("amount")
        .description("Amount in the smallest currency sub-unit (e.g. 29500 for 295 INR)")
        .minimum(100);
    if required { param.required() } else { param }
}

pub(crate) fn currency_param() -> ParamSpec {
    ParamSpec::string("currency")
        .required()
        .description("ISO 4217 currency code, e.g. INR")
        .pattern("^[A-Z]{3}$")
}
