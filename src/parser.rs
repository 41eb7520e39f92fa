//! Validation of untyped drawing documents into a [`Drawing`].
//!
//! The accepted document is `{"items": [...]}`. Each element either carries an
//! explicit `type` tag or is recognized by its fields: arrow coordinates make
//! an arrow, box geometry makes a box, a lone `text` makes an unknown-text
//! fragment. Extra fields are ignored and optional fields may be `null`.

use log::{debug, trace};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::ir::{
    ArrowItem, BoxItem, Corners, Drawing, EllipseItem, Item, ItemKind, LineStyle, Style,
    UnknownText,
};

const ROOT: &str = "$";

const TAG_FIELDS: [&str; 2] = ["type", "kind"];
const ARROW_FIELDS: [&str; 5] = ["start_x", "start_y", "end_x", "end_y", "head_size"];
const SHAPE_FIELDS: [&str; 4] = ["x", "y", "width", "height"];
const KIND_TOKENS: &[&str] = &["box", "ellipse", "arrow", "unknown_text"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationErrorKind {
    #[error("malformed document: {0}")]
    Syntax(String),
    #[error("missing required field")]
    MissingField,
    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    #[error("expected one of {expected:?}, found {found:?}")]
    UnknownLiteral {
        expected: &'static [&'static str],
        found: String,
    },
    #[error("{0}")]
    InvalidValue(&'static str),
}

/// A document that does not describe a valid [`Drawing`].
///
/// `path` locates the offending value, e.g. `items[2].style.line_style`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid drawing at `{path}`: {kind}")]
pub struct ValidationError {
    pub path: String,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, kind: ValidationErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    fn syntax(message: impl Into<String>) -> Self {
        Self::new(ROOT, ValidationErrorKind::Syntax(message.into()))
    }

    /// Last segment of the path, i.e. the name of the offending field.
    pub fn field(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }
}

/// Parses a strict JSON drawing document.
pub fn parse_drawing(input: &str) -> Result<Drawing, ValidationError> {
    let value: Value = serde_json::from_str(input).map_err(|err| {
        let err = ValidationError::syntax(err.to_string());
        debug!(error:% = err; "Rejected drawing document");
        err
    })?;
    Drawing::from_value(&value)
}

/// Parses JSON, falling back to JSON5 (comments, trailing commas, unquoted
/// keys) when strict parsing fails.
pub fn parse_drawing_lenient(input: &str) -> Result<Drawing, ValidationError> {
    match serde_json::from_str::<Value>(input) {
        Ok(value) => Drawing::from_value(&value),
        Err(json_err) => Drawing::from_json5(input).map_err(|err| match err.kind {
            // Report the strict parser's position, it is the more precise one.
            ValidationErrorKind::Syntax(_) => ValidationError::syntax(json_err.to_string()),
            _ => err,
        }),
    }
}

impl Drawing {
    /// Validates decoded document data.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let result = parse_root(value);
        match &result {
            Ok(drawing) => debug!(items = drawing.items.len(); "Drawing validated"),
            Err(err) => debug!(error:% = err; "Rejected drawing document"),
        }
        result
    }

    /// Parses a JSON5 drawing document. Plain JSON is valid JSON5.
    pub fn from_json5(input: &str) -> Result<Self, ValidationError> {
        let value: Value = json5::from_str(input).map_err(|err| {
            let err = ValidationError::syntax(err.to_string());
            debug!(error:% = err; "Rejected drawing document");
            err
        })?;
        trace!("Document accepted as JSON5");
        Self::from_value(&value)
    }
}

fn parse_root(value: &Value) -> Result<Drawing, ValidationError> {
    let root = Fields::new(value, ROOT.to_string())?;
    let items_path = root.child_path("items");
    let items_value = root
        .map
        .get("items")
        .ok_or_else(|| ValidationError::new(&items_path, ValidationErrorKind::MissingField))?;
    let Value::Array(values) = items_value else {
        return Err(wrong_type(&items_path, "array", items_value));
    };

    let items = values
        .iter()
        .enumerate()
        .map(|(idx, value)| parse_item(value, format!("items[{idx}]")))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Drawing { items })
}

fn parse_item(value: &Value, path: String) -> Result<Item, ValidationError> {
    let fields = Fields::new(value, path)?;
    let kind = detect_kind(&fields)?;
    trace!(path = fields.path.as_str(), kind = kind.as_str(); "Parsing item");

    let item = match kind {
        ItemKind::Box => Item::Box(BoxItem {
            x: fields.required_int("x")?,
            y: fields.required_int("y")?,
            width: fields.required_int("width")?,
            height: fields.required_int("height")?,
            text: fields.optional_string("text")?,
            style: fields.optional_style("style")?,
        }),
        ItemKind::Ellipse => Item::Ellipse(EllipseItem {
            x: fields.required_int("x")?,
            y: fields.required_int("y")?,
            width: fields.required_int("width")?,
            height: fields.required_int("height")?,
            text: fields.optional_string("text")?,
            style: fields.optional_style("style")?,
        }),
        ItemKind::Arrow => Item::Arrow(ArrowItem {
            start_x: fields.required_int("start_x")?,
            start_y: fields.required_int("start_y")?,
            end_x: fields.required_int("end_x")?,
            end_y: fields.required_int("end_y")?,
            style: fields.optional_style("style")?,
            head_size: fields.optional_positive("head_size")?,
        }),
        ItemKind::UnknownText => {
            let text = fields.required_string("text")?;
            let ignored = fields.unused_keys(&["text"]);
            if !ignored.is_empty() {
                debug!(
                    path = fields.path.as_str(),
                    ignored:? = ignored;
                    "Unknown text keeps only `text`, other fields are dropped"
                );
            }
            Item::UnknownText(UnknownText { text })
        }
    };
    Ok(item)
}

fn detect_kind(fields: &Fields<'_>) -> Result<ItemKind, ValidationError> {
    for tag in TAG_FIELDS {
        let Some(tag_value) = fields.map.get(tag) else {
            continue;
        };
        let path = fields.child_path(tag);
        let Value::String(token) = tag_value else {
            return Err(wrong_type(&path, "string", tag_value));
        };
        return ItemKind::from_token(token).ok_or_else(|| {
            ValidationError::new(
                path,
                ValidationErrorKind::UnknownLiteral {
                    expected: KIND_TOKENS,
                    found: token.clone(),
                },
            )
        });
    }

    if fields.has_any(&ARROW_FIELDS) {
        Ok(ItemKind::Arrow)
    } else if fields.has_any(&SHAPE_FIELDS) {
        Ok(ItemKind::Box)
    } else if fields.map.contains_key("text") {
        Ok(ItemKind::UnknownText)
    } else {
        Err(ValidationError::new(
            fields.path.clone(),
            ValidationErrorKind::InvalidValue("element matches no known kind"),
        ))
    }
}

fn parse_style(value: &Value, path: String) -> Result<Style, ValidationError> {
    let fields = Fields::new(value, path)?;
    Ok(Style {
        corners: fields.optional_literal("corners", Corners::TOKENS, Corners::from_token)?,
        line_thickness: fields.optional_positive("line_thickness")?,
        line_color: fields.optional_string("line_color")?,
        fill_color: fields.optional_string("fill_color")?,
        line_style: fields.optional_literal("line_style", LineStyle::TOKENS, LineStyle::from_token)?,
    })
}

/// Typed accessors over one JSON object, carrying its path for errors.
struct Fields<'a> {
    map: &'a Map<String, Value>,
    path: String,
}

impl<'a> Fields<'a> {
    fn new(value: &'a Value, path: String) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Ok(Self { map, path }),
            other => Err(wrong_type(&path, "object", other)),
        }
    }

    fn child_path(&self, name: &str) -> String {
        if self.path == ROOT {
            name.to_string()
        } else {
            format!("{}.{}", self.path, name)
        }
    }

    fn has_any(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.map.contains_key(*name))
    }

    /// Keys other than the kind tag and `used`.
    fn unused_keys(&self, used: &[&str]) -> Vec<&'a str> {
        self.map
            .keys()
            .map(String::as_str)
            .filter(|key| !TAG_FIELDS.contains(key) && !used.contains(key))
            .collect()
    }

    /// Present and non-null value, if any.
    fn get(&self, name: &str) -> Option<&'a Value> {
        self.map.get(name).filter(|value| !value.is_null())
    }

    fn required(&self, name: &str) -> Result<&'a Value, ValidationError> {
        match self.map.get(name) {
            Some(value) => Ok(value),
            None => Err(ValidationError::new(
                self.child_path(name),
                ValidationErrorKind::MissingField,
            )),
        }
    }

    fn required_int(&self, name: &str) -> Result<i32, ValidationError> {
        let value = self.required(name)?;
        as_i32(value, &self.child_path(name))
    }

    fn optional_positive(&self, name: &str) -> Result<Option<u32>, ValidationError> {
        let Some(value) = self.get(name) else {
            return Ok(None);
        };
        let path = self.child_path(name);
        let number = as_i32(value, &path)?;
        if number <= 0 {
            return Err(ValidationError::new(
                path,
                ValidationErrorKind::InvalidValue("expected a positive integer"),
            ));
        }
        Ok(Some(number.unsigned_abs()))
    }

    fn required_string(&self, name: &str) -> Result<String, ValidationError> {
        let value = self.required(name)?;
        match value {
            Value::String(text) => Ok(text.clone()),
            other => Err(wrong_type(&self.child_path(name), "string", other)),
        }
    }

    fn optional_string(&self, name: &str) -> Result<Option<String>, ValidationError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.clone())),
            Some(other) => Err(wrong_type(&self.child_path(name), "string", other)),
        }
    }

    fn optional_literal<T>(
        &self,
        name: &str,
        tokens: &'static [&'static str],
        from_token: fn(&str) -> Option<T>,
    ) -> Result<Option<T>, ValidationError> {
        let Some(token) = self.optional_string(name)? else {
            return Ok(None);
        };
        from_token(&token).map(Some).ok_or_else(|| {
            ValidationError::new(
                self.child_path(name),
                ValidationErrorKind::UnknownLiteral {
                    expected: tokens,
                    found: token,
                },
            )
        })
    }

    fn optional_style(&self, name: &str) -> Result<Option<Style>, ValidationError> {
        match self.get(name) {
            None => Ok(None),
            Some(value) => parse_style(value, self.child_path(name)).map(Some),
        }
    }
}

fn as_i32(value: &Value, path: &str) -> Result<i32, ValidationError> {
    let Value::Number(number) = value else {
        return Err(wrong_type(path, "integer", value));
    };
    // Large unsigned values and integral floats both land in the float arm;
    // the cast saturates, so the range check below still rejects them.
    let wide = if let Some(int) = number.as_i64() {
        int
    } else if let Some(float) = number.as_f64().filter(|f| f.is_finite() && f.fract() == 0.0) {
        float as i64
    } else {
        return Err(ValidationError::new(
            path,
            ValidationErrorKind::WrongType {
                expected: "integer",
                found: "fractional number",
            },
        ));
    };
    i32::try_from(wide).map_err(|_| out_of_range(path))
}

fn out_of_range(path: &str) -> ValidationError {
    ValidationError::new(
        path,
        ValidationErrorKind::InvalidValue("integer out of range"),
    )
}

fn wrong_type(path: &str, expected: &'static str, found: &Value) -> ValidationError {
    ValidationError::new(
        path,
        ValidationErrorKind::WrongType {
            expected,
            found: type_name(found),
        },
    )
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_tagged_and_shaped_items() {
        let input = r#"{
            "items": [
                {"x": 10, "y": 20, "width": 80, "height": 20, "text": "foo"},
                {"type": "ellipse", "x": 200, "y": 50, "width": 100, "height": 50},
                {"start_x": 1, "start_y": 2, "end_x": 3, "end_y": 4, "head_size": 12},
                {"text": "garbled input"}
            ]
        }"#;
        let drawing = parse_drawing(input).expect("valid drawing");
        let kinds: Vec<_> = drawing.items.iter().map(Item::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ItemKind::Box,
                ItemKind::Ellipse,
                ItemKind::Arrow,
                ItemKind::UnknownText
            ]
        );
        let Item::Box(ref b) = drawing.items[0] else {
            panic!("expected box");
        };
        assert_eq!(b.text.as_deref(), Some("foo"));
        assert_eq!(b.style, None);
        let Item::Arrow(ref a) = drawing.items[2] else {
            panic!("expected arrow");
        };
        assert_eq!(a.head_size, Some(12));
    }

    #[test]
    fn empty_items_is_valid() {
        let drawing = parse_drawing(r#"{"items": []}"#).unwrap();
        assert!(drawing.is_empty());
    }

    #[test]
    fn missing_width_names_the_field() {
        let err = parse_drawing(r#"{"items": [{"type": "box", "x": 1, "y": 2, "height": 3}]}"#)
            .unwrap_err();
        assert_eq!(err.path, "items[0].width");
        assert_eq!(err.field(), "width");
        assert_eq!(err.kind, ValidationErrorKind::MissingField);
    }

    #[test]
    fn untagged_box_missing_width_is_not_unknown_text() {
        let err = parse_drawing(r#"{"items": [{"x": 1, "y": 2, "height": 3, "text": "hi"}]}"#)
            .unwrap_err();
        assert_eq!(err.path, "items[0].width");
    }

    #[test]
    fn missing_items_is_rejected() {
        let err = parse_drawing("{}").unwrap_err();
        assert_eq!(err.path, "items");
        assert_eq!(err.kind, ValidationErrorKind::MissingField);
    }

    #[test]
    fn wrong_primitive_type_is_rejected() {
        let err = Drawing::from_value(&json!({
            "items": [{"type": "box", "x": "ten", "y": 0, "width": 1, "height": 1}]
        }))
        .unwrap_err();
        assert_eq!(err.path, "items[0].x");
        assert_eq!(
            err.kind,
            ValidationErrorKind::WrongType {
                expected: "integer",
                found: "string"
            }
        );
    }

    #[test]
    fn fractional_coordinates_are_rejected() {
        let err = Drawing::from_value(&json!({
            "items": [{"type": "box", "x": 1.5, "y": 0, "width": 1, "height": 1}]
        }))
        .unwrap_err();
        assert_eq!(err.path, "items[0].x");

        let drawing = Drawing::from_value(&json!({
            "items": [{"type": "box", "x": 2.0, "y": 0, "width": 1, "height": 1}]
        }))
        .unwrap();
        let Item::Box(ref b) = drawing.items[0] else {
            panic!("expected box");
        };
        assert_eq!(b.x, 2);
    }

    #[test]
    fn literal_outside_declared_set_is_rejected() {
        let err = Drawing::from_value(&json!({
            "items": [{
                "type": "box", "x": 0, "y": 0, "width": 1, "height": 1,
                "style": {"line_style": "wavy"}
            }]
        }))
        .unwrap_err();
        assert_eq!(err.path, "items[0].style.line_style");
        assert!(matches!(
            err.kind,
            ValidationErrorKind::UnknownLiteral { ref found, .. } if found == "wavy"
        ));

        let err = Drawing::from_value(&json!({
            "items": [{
                "type": "ellipse", "x": 0, "y": 0, "width": 1, "height": 1,
                "style": {"corners": "round"}
            }]
        }))
        .unwrap_err();
        assert_eq!(err.path, "items[0].style.corners");
    }

    #[test]
    fn partial_style_keeps_unset_and_empty_apart() {
        let drawing = Drawing::from_value(&json!({
            "items": [{
                "type": "box", "x": 0, "y": 0, "width": 1, "height": 1,
                "style": {"line_color": "", "fill_color": null, "line_thickness": 3}
            }]
        }))
        .unwrap();
        let Item::Box(ref b) = drawing.items[0] else {
            panic!("expected box");
        };
        let style = b.style.as_ref().unwrap();
        assert_eq!(style.line_color.as_deref(), Some(""));
        assert_eq!(style.fill_color, None);
        assert_eq!(style.line_thickness, Some(3));
        assert_eq!(style.corners, None);
    }

    #[test]
    fn non_positive_thickness_is_rejected() {
        let err = Drawing::from_value(&json!({
            "items": [{
                "type": "box", "x": 0, "y": 0, "width": 1, "height": 1,
                "style": {"line_thickness": 0}
            }]
        }))
        .unwrap_err();
        assert_eq!(err.path, "items[0].style.line_thickness");
    }

    #[test]
    fn unknown_tag_and_shapeless_item_are_rejected() {
        let err = Drawing::from_value(&json!({"items": [{"type": "triangle"}]})).unwrap_err();
        assert_eq!(err.path, "items[0].type");

        let err = Drawing::from_value(&json!({"items": [{"color": "red"}]})).unwrap_err();
        assert_eq!(err.path, "items[0]");

        let err = Drawing::from_value(&json!({"items": [42]})).unwrap_err();
        assert_eq!(err.path, "items[0]");
    }

    #[test]
    fn tags_are_case_insensitive_without_shape_aliases() {
        let drawing = Drawing::from_value(&json!({"items": [
            {"type": "BOX", "x": 0, "y": 0, "width": 1, "height": 1},
            {"kind": "UnknownText", "text": "?"}
        ]}))
        .unwrap();
        assert_eq!(drawing.items[0].kind(), ItemKind::Box);
        assert_eq!(drawing.items[1].kind(), ItemKind::UnknownText);

        for alias in ["rect", "rectangle", "oval"] {
            let err = Drawing::from_value(&json!({
                "items": [{"type": alias, "x": 0, "y": 0, "width": 1, "height": 1}]
            }))
            .unwrap_err();
            assert_eq!(err.path, "items[0].type");
            assert!(matches!(
                err.kind,
                ValidationErrorKind::UnknownLiteral { expected, .. } if expected == KIND_TOKENS
            ));
        }
    }

    #[test]
    fn non_positive_head_size_is_rejected() {
        for head_size in [0, -3] {
            let err = Drawing::from_value(&json!({
                "items": [{"start_x": 0, "start_y": 0, "end_x": 5, "end_y": 5, "head_size": head_size}]
            }))
            .unwrap_err();
            assert_eq!(err.path, "items[0].head_size");
            assert_eq!(
                err.kind,
                ValidationErrorKind::InvalidValue("expected a positive integer")
            );
        }
    }

    #[test]
    fn integers_outside_i32_are_rejected() {
        let out_of_range = ValidationErrorKind::InvalidValue("integer out of range");
        let err = Drawing::from_value(&json!({
            "items": [{"type": "box", "x": 3_000_000_000_i64, "y": 0, "width": 1, "height": 1}]
        }))
        .unwrap_err();
        assert_eq!(err.path, "items[0].x");
        assert_eq!(err.kind, out_of_range);

        let err = parse_drawing(
            r#"{"items": [{"start_x": 0, "start_y": -1e12, "end_x": 1, "end_y": 1}]}"#,
        )
        .unwrap_err();
        assert_eq!(err.path, "items[0].start_y");
        assert_eq!(err.kind, out_of_range);

        let drawing = Drawing::from_value(&json!({
            "items": [{"type": "box", "x": i32::MIN, "y": i32::MAX, "width": 1, "height": 1}]
        }))
        .unwrap();
        let Item::Box(ref b) = drawing.items[0] else {
            panic!("expected box");
        };
        assert_eq!((b.x, b.y), (i32::MIN, i32::MAX));
    }

    #[test]
    fn lone_text_drops_its_other_fields() {
        let drawing = Drawing::from_value(&json!({
            "items": [{"text": "stray", "style": {"line_color": "red"}, "note": 1}]
        }))
        .unwrap();
        assert_eq!(
            drawing.items,
            vec![Item::UnknownText(UnknownText {
                text: "stray".to_string()
            })]
        );
    }

    #[test]
    fn unused_keys_skip_the_tag_and_used_fields() {
        let value = json!({"type": "unknown_text", "text": "x", "style": {}, "z": 0});
        let fields = Fields::new(&value, "items[0]".to_string()).unwrap();
        let mut unused = fields.unused_keys(&["text"]);
        unused.sort_unstable();
        assert_eq!(unused, vec!["style", "z"]);
    }

    #[test]
    fn unknown_text_requires_text() {
        let err = Drawing::from_value(&json!({"items": [{"type": "unknown_text"}]})).unwrap_err();
        assert_eq!(err.path, "items[0].text");
        assert_eq!(err.kind, ValidationErrorKind::MissingField);
    }

    #[test]
    fn lenient_parsing_accepts_json5() {
        let input = "{ items: [ { type: 'box', x: 1, y: 2, width: 3, height: 4, }, ], // trailing\n }";
        let drawing = parse_drawing_lenient(input).unwrap();
        assert_eq!(drawing.items.len(), 1);
        assert!(parse_drawing(input).is_err());
    }

    #[test]
    fn from_json5_validates_like_from_value() {
        let drawing = Drawing::from_json5(
            "{ items: [ /* arrow */ { start_x: 0, start_y: 0, end_x: 10, end_y: 0, head_size: 4 } ] }",
        )
        .unwrap();
        let Item::Arrow(ref a) = drawing.items[0] else {
            panic!("expected arrow");
        };
        assert_eq!(a.head_size, Some(4));

        let err = Drawing::from_json5("{ items: [ { type: 'ellipse', x: 1, y: 1, height: 2 } ] }")
            .unwrap_err();
        assert_eq!(err.path, "items[0].width");

        let err = Drawing::from_json5("{ items: ").unwrap_err();
        assert_eq!(err.path, ROOT);
        assert!(matches!(err.kind, ValidationErrorKind::Syntax(_)));
    }

    #[test]
    fn lenient_parsing_reports_validation_errors_from_json5() {
        let err = parse_drawing_lenient("{ items: [ { type: 'box', x: 1, y: 2, height: 3 } ] }")
            .unwrap_err();
        assert_eq!(err.path, "items[0].width");
        assert_eq!(err.kind, ValidationErrorKind::MissingField);
    }

    #[test]
    fn syntax_errors_point_at_the_root() {
        let err = parse_drawing_lenient("{ items: [").unwrap_err();
        assert_eq!(err.path, ROOT);
        assert!(matches!(err.kind, ValidationErrorKind::Syntax(_)));
    }

    #[test]
    fn serialized_drawing_validates_back() {
        let drawing = Drawing::sample();
        let text = serde_json::to_string(&drawing).unwrap();
        assert_eq!(parse_drawing(&text).unwrap(), drawing);
    }

    #[test]
    fn serde_deserialize_goes_through_validation() {
        let drawing: Drawing =
            serde_json::from_str(r#"{"items": [{"text": "only text"}]}"#).unwrap();
        assert_eq!(drawing.items[0].kind(), ItemKind::UnknownText);

        let err = serde_json::from_str::<Drawing>(r#"{"items": [{"type": "arrow"}]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("items[0].start_x"));
    }
}
