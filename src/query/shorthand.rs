//! Terse query shorthand carried in the payload's `mdx` field.
//!
//! A single string of semicolon-separated clauses; the leading keyword is
//! case-insensitive:
//!
//! ```text
//! MEASURES revenue, units;
//! ROWS time.year, geography.region;
//! COLUMNS product.category;
//! SLICE geography.region = 'North America';
//! DICE time.quarter IN (Q1, Q2);
//! FILTER time.year >= 2023;
//! DRILL time year -> month PATH 2023;
//! ROLLUP time quarter
//! ```
//!
//! Unquoted tokens that parse as numbers become numbers; quotes force
//! strings. The structured payload overrides whatever this produces, field
//! by field, at the single merge site in [`crate::query::normalize`].

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{EngineError, EngineResult};
use crate::model::query::{
    AxisInput, DrillInput, FilterInput, FilterOp, FilterValue, RollupInput,
};
use crate::model::types::Scalar;

static SLICE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?is)slice\s+([\w.]+)\s*=\s*(.+)$").unwrap());
static DICE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?is)dice\s+([\w.]+)\s+in\s*\((.*)\)\s*$").unwrap());
static FILTER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?is)filter\s+([\w.]+)\s*(!=|>=|<=|=|>|<)\s*(.+)$").unwrap());
static DRILL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?is)drill\s+(\w+)\s+(\w+)\s+(?:->|to)\s+(\w+)(?:\s+path\s+(.+))?$").unwrap()
});
static ROLLUP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?is)rollup\s+(\w+)\s+(\w+)\s*$").unwrap());

/// The partial query a shorthand string expands to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShorthandQuery {
    pub measures: Vec<String>,
    pub rows: Vec<AxisInput>,
    pub columns: Vec<AxisInput>,
    pub slices: Vec<FilterInput>,
    pub dices: Vec<FilterInput>,
    pub filters: Vec<FilterInput>,
    pub drill: Option<DrillInput>,
    pub rollup: Option<RollupInput>,
}

/// Parse a shorthand string into a partial query.
pub fn parse(input: &str) -> EngineResult<ShorthandQuery> {
    let mut query = ShorthandQuery::default();

    for clause in input.split(';') {
        let clause = clause.trim();
        if clause.is_empty() {
            continue;
        }

        let keyword = clause
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        match keyword.as_str() {
            "measures" => query.measures = parse_name_list(rest_of(clause)),
            "rows" => query.rows = parse_axis_list(rest_of(clause)),
            "columns" => query.columns = parse_axis_list(rest_of(clause)),
            "slice" => query.slices.push(parse_slice(clause)?),
            "dice" => query.dices.push(parse_dice(clause)?),
            "filter" => query.filters.push(parse_filter(clause)?),
            "drill" => query.drill = Some(parse_drill(clause)?),
            "rollup" => query.rollup = Some(parse_rollup(clause)?),
            _ => {
                return Err(syntax(clause, &format!("unknown keyword '{}'", keyword)));
            }
        }
    }

    Ok(query)
}

fn rest_of(clause: &str) -> &str {
    clause
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest)
        .unwrap_or("")
}

fn syntax(clause: &str, message: &str) -> EngineError {
    EngineError::ShorthandSyntax {
        clause: clause.to_string(),
        message: message.to_string(),
    }
}

fn parse_name_list(body: &str) -> Vec<String> {
    body.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_axis_list(body: &str) -> Vec<AxisInput> {
    body.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| match token.split_once('.') {
            Some((dimension, level)) => AxisInput::at_level(dimension, level),
            None => AxisInput::new(token),
        })
        .collect()
}

/// `dim.level` → (dimension, level); a bare dimension leaves the level to
/// the normalizer's finest-level default.
fn split_target(token: &str) -> (String, Option<String>) {
    match token.split_once('.') {
        Some((dimension, level)) => (dimension.to_string(), Some(level.to_string())),
        None => (token.to_string(), None),
    }
}

fn parse_scalar(token: &str) -> Scalar {
    let token = token.trim();
    let unquoted = token
        .strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .or_else(|| token.strip_prefix('"').and_then(|t| t.strip_suffix('"')));
    if let Some(text) = unquoted {
        return Scalar::Str(text.to_string());
    }
    match token.parse::<f64>() {
        Ok(n) => Scalar::Number(n),
        Err(_) => Scalar::Str(token.to_string()),
    }
}

fn parse_scalar_list(body: &str) -> Vec<Scalar> {
    body.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_scalar)
        .collect()
}

fn parse_slice(clause: &str) -> EngineResult<FilterInput> {
    let caps = SLICE_PATTERN
        .captures(clause)
        .ok_or_else(|| syntax(clause, "expected 'SLICE dim.level = value'"))?;
    let (dimension, level) = split_target(&caps[1]);
    Ok(FilterInput {
        dimension,
        level,
        operator: FilterOp::Eq,
        value: FilterValue::One(parse_scalar(&caps[2])),
    })
}

fn parse_dice(clause: &str) -> EngineResult<FilterInput> {
    let caps = DICE_PATTERN
        .captures(clause)
        .ok_or_else(|| syntax(clause, "expected 'DICE dim.level IN (v1, v2, ...)'"))?;
    let values = parse_scalar_list(&caps[2]);
    if values.is_empty() {
        return Err(syntax(clause, "DICE requires at least one value"));
    }
    let (dimension, level) = split_target(&caps[1]);
    Ok(FilterInput {
        dimension,
        level,
        operator: FilterOp::In,
        value: FilterValue::Many(values),
    })
}

fn parse_filter(clause: &str) -> EngineResult<FilterInput> {
    let caps = FILTER_PATTERN.captures(clause).ok_or_else(|| {
        syntax(
            clause,
            "expected 'FILTER dim.level OP value' with OP one of =, !=, >, >=, <, <=",
        )
    })?;
    let operator = match &caps[2] {
        "=" => FilterOp::Eq,
        "!=" => FilterOp::Neq,
        ">" => FilterOp::Gt,
        ">=" => FilterOp::Gte,
        "<" => FilterOp::Lt,
        "<=" => FilterOp::Lte,
        other => return Err(syntax(clause, &format!("unsupported operator '{}'", other))),
    };
    let (dimension, level) = split_target(&caps[1]);
    Ok(FilterInput {
        dimension,
        level,
        operator,
        value: FilterValue::One(parse_scalar(&caps[3])),
    })
}

fn parse_drill(clause: &str) -> EngineResult<DrillInput> {
    let caps = DRILL_PATTERN.captures(clause).ok_or_else(|| {
        syntax(clause, "expected 'DRILL dim fromLevel -> toLevel [PATH v1, v2, ...]'")
    })?;
    let path = caps
        .get(4)
        .map(|m| parse_scalar_list(m.as_str()))
        .unwrap_or_default();
    Ok(DrillInput {
        dimension: caps[1].to_string(),
        from_level: caps[2].to_string(),
        to_level: caps[3].to_string(),
        path,
    })
}

fn parse_rollup(clause: &str) -> EngineResult<RollupInput> {
    let caps = ROLLUP_PATTERN
        .captures(clause)
        .ok_or_else(|| syntax(clause, "expected 'ROLLUP dim level'"))?;
    Ok(RollupInput {
        dimension: caps[1].to_string(),
        level: caps[2].to_string(),
    })
}
