use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::{ErrorEntry, to_snake_case};

/// Highest code accepted for an error. Codes are HTTP-like.
const MAX_CODE: i32 = 600;

/// An error catalog: one or more enums of named errors.
#[derive(Debug, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub enums: Vec<EnumConfig>,
}

impl Catalog {
    /// Load a catalog, as JSON when the extension is `.json` and as TOML
    /// otherwise.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read error catalog {}", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::from_str(&text)
                .with_context(|| format!("invalid JSON in {}", path.display()))
        } else {
            toml::from_str(&text).with_context(|| format!("invalid TOML in {}", path.display()))
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid TOML error catalog")
    }
}

/// An enum of errors sharing an optional default code.
#[derive(Debug, Deserialize)]
pub struct EnumConfig {
    pub name: String,
    #[serde(default)]
    pub default_code: Option<i32>,
    #[serde(default)]
    pub values: Vec<ValueConfig>,
}

impl EnumConfig {
    /// The code used by values that do not set their own, 0 when unset.
    pub fn default_code(&self) -> Result<i32> {
        let code = self.default_code.unwrap_or(0);
        if !(0..=MAX_CODE).contains(&code) {
            bail!(
                "enum '{}': default_code {} out of range 0..={}",
                self.name,
                code,
                MAX_CODE
            );
        }
        Ok(code)
    }
}

/// One named error.
#[derive(Debug, Deserialize)]
pub struct ValueConfig {
    pub name: String,
    #[serde(default)]
    pub number: Option<i32>,
    #[serde(default)]
    pub code: Option<i32>,
    #[serde(default)]
    pub pretty: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl ValueConfig {
    /// Resolve this value into an entry. `None` when neither the value nor
    /// its enum gives a code.
    pub fn to_entry(&self, owner: &EnumConfig, default_code: i32) -> Result<Option<ErrorEntry>> {
        let code = match self.code {
            Some(0) | None => default_code,
            Some(code) => code,
        };
        if !(0..=MAX_CODE).contains(&code) {
            bail!(
                "{}.{}: code {} out of range 0..={}",
                owner.name,
                self.name,
                code,
                MAX_CODE
            );
        }
        if code == 0 {
            return Ok(None);
        }

        let fn_name = to_snake_case(&self.name)
            .with_context(|| format!("{}.{}: cannot derive a function name", owner.name, self.name))?;
        let comment = self
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|comment| !comment.is_empty())
            .map(str::to_string);

        Ok(Some(ErrorEntry {
            enum_name: owner.name.clone(),
            reason: self.name.clone(),
            number: self.number,
            code,
            pretty: self.pretty.clone().unwrap_or_default(),
            message: self.message.clone().unwrap_or_default(),
            comment,
            static_name: fn_name.trim_end_matches('_').to_uppercase(),
            fn_name,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
        [[enums]]
        name = "ErrorReason"
        default_code = 500

        [[enums.values]]
        name = "USER_NOT_FOUND"
        number = 1
        code = 404
        pretty = "User not found"
        message = "user not found"

        [[enums.values]]
        name = "DATABASE_DOWN"
        number = 2
    "#;

    #[test]
    fn test_parse_toml() {
        let catalog = Catalog::from_toml_str(CATALOG).unwrap();
        assert_eq!(catalog.enums.len(), 1);
        let owner = &catalog.enums[0];
        assert_eq!(owner.default_code().unwrap(), 500);
        assert_eq!(owner.values.len(), 2);
        assert_eq!(owner.values[0].code, Some(404));
        assert_eq!(owner.values[1].pretty, None);
    }

    #[test]
    fn test_value_falls_back_to_default_code() {
        let catalog = Catalog::from_toml_str(CATALOG).unwrap();
        let owner = &catalog.enums[0];
        let entry = owner.values[1].to_entry(owner, 500).unwrap().unwrap();
        assert_eq!(entry.code, 500);
        assert_eq!(entry.fn_name, "database_down");
        assert_eq!(entry.static_name, "DATABASE_DOWN");
        assert_eq!(entry.pretty, "");
    }

    #[test]
    fn test_value_without_any_code_is_skipped() {
        let catalog = Catalog::from_toml_str(
            r#"
            [[enums]]
            name = "Plain"
            [[enums.values]]
            name = "UNSPECIFIED"
            "#,
        )
        .unwrap();
        let owner = &catalog.enums[0];
        assert!(owner.values[0].to_entry(owner, 0).unwrap().is_none());
    }

    #[test]
    fn test_out_of_range_codes() {
        let catalog = Catalog::from_toml_str(
            r#"
            [[enums]]
            name = "Broken"
            default_code = 700
            [[enums.values]]
            name = "NEGATIVE"
            code = -1
            "#,
        )
        .unwrap();
        let owner = &catalog.enums[0];
        let err = owner.default_code().unwrap_err();
        assert!(err.to_string().contains("default_code 700"));

        let err = owner.values[0].to_entry(owner, 0).unwrap_err();
        assert!(err.to_string().contains("Broken.NEGATIVE"));
    }

    #[test]
    fn test_from_path_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.json");
        fs::write(
            &path,
            r#"{"enums": [{"name": "E", "default_code": 400, "values": [{"name": "BAD"}]}]}"#,
        )
        .unwrap();
        let catalog = Catalog::from_path(&path).unwrap();
        assert_eq!(catalog.enums[0].values[0].name, "BAD");
    }

    #[test]
    fn test_from_path_reports_file() {
        let err = Catalog::from_path("/nonexistent/errors.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/errors.toml"));
    }
}
