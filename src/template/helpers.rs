// ABOUTME: Handlebars helper functions available to scenario value templates
// ABOUTME: Implements case conversion, JSON serialization, timestamps and UUIDs

use chrono::Utc;
use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, JsonTruthy, Output, PathAndJson,
    RenderContext, RenderError, RenderErrorReason, Renderable,
};
use std::fmt::Write as _;
use uuid::Uuid;

use super::context::{is_null_marker, restore_nulls, NONE_LITERAL};

fn helper_error(message: impl Into<String>) -> RenderError {
    RenderErrorReason::Other(message.into()).into()
}

/// First param, with an unbound lookup reported as unresolved
fn bound_param<'a, 'rc>(
    h: &'a Helper<'rc>,
    helper: &str,
) -> Result<&'a PathAndJson<'rc>, RenderError> {
    let param = h
        .param(0)
        .ok_or_else(|| helper_error(format!("{} helper requires a parameter", helper)))?;

    if param.is_value_missing() {
        return Err(RenderErrorReason::MissingVariable(param.relative_path().cloned()).into());
    }
    Ok(param)
}

/// First param as text; null prints as `None`
fn text_param<'a>(h: &'a Helper, helper: &str) -> Result<&'a str, RenderError> {
    let param = bound_param(h, helper)?;
    if is_null_marker(param.value()) {
        return Ok(NONE_LITERAL);
    }

    param
        .value()
        .as_str()
        .ok_or_else(|| helper_error(format!("{} helper requires a string parameter", helper)))
}

/// Uppercase helper
pub fn upper_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let input = text_param(h, "upper")?;
    out.write(&input.to_uppercase())?;
    Ok(())
}

/// Lowercase helper
pub fn lower_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let input = text_param(h, "lower")?;
    out.write(&input.to_lowercase())?;
    Ok(())
}

/// JSON helper - writes the parameter as compact JSON text.
///
/// Pairs with the `json` loader to move structured params into a variable.
pub fn tojson_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let value = restore_nulls(bound_param(h, "tojson")?.value());

    let encoded = serde_json::to_string(&value)
        .map_err(|e| helper_error(format!("tojson serialization error: {}", e)))?;
    out.write(&encoded)?;
    Ok(())
}

/// `if`/`unless` replacement that treats null bindings as falsy
#[derive(Clone, Copy)]
pub struct ConditionHelper {
    positive: bool,
}

impl HelperDef for ConditionHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let name = if self.positive { "if" } else { "unless" };
        let param = h
            .param(0)
            .ok_or(RenderErrorReason::ParamNotFoundForIndex(name, 0))?;
        let include_zero = h
            .hash_get("includeZero")
            .and_then(|v| v.value().as_bool())
            .unwrap_or(false);

        let truthy = !is_null_marker(param.value()) && param.value().is_truthy(include_zero);
        let template = if truthy == self.positive {
            h.template()
        } else {
            h.inverse()
        };

        match template {
            Some(t) => t.render(r, ctx, rc, out),
            None => Ok(()),
        }
    }
}

/// Timestamp helper - formats current UTC time with optional format string
pub fn timestamp_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let format = h
        .param(0)
        .and_then(|v| v.value().as_str())
        .unwrap_or("%Y-%m-%dT%H:%M:%SZ");

    let mut formatted = String::new();
    write!(formatted, "{}", Utc::now().format(format))
        .map_err(|_| helper_error(format!("invalid timestamp format '{}'", format)))?;
    out.write(&formatted)?;
    Ok(())
}

/// UUID helper - generates a new UUID v4
pub fn uuid_helper(
    _h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    out.write(&Uuid::new_v4().to_string())?;
    Ok(())
}

/// Register all built-in helpers with a Handlebars instance
pub fn register_helpers(handlebars: &mut Handlebars) {
    handlebars.register_helper("if", Box::new(ConditionHelper { positive: true }));
    handlebars.register_helper("unless", Box::new(ConditionHelper { positive: false }));
    handlebars.register_helper("upper", Box::new(upper_helper));
    handlebars.register_helper("lower", Box::new(lower_helper));
    handlebars.register_helper("tojson", Box::new(tojson_helper));
    handlebars.register_helper("timestamp", Box::new(timestamp_helper));
    handlebars.register_helper("uuid", Box::new(uuid_helper));
}
