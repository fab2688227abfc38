use serde::{Deserialize, Serialize};

/// One entry of a `.1pif` export.
///
/// Every attribute is optional in the export, so missing keys fall back to
/// their defaults and unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Item {
    pub uuid: Option<String>,
    pub type_name: Option<String>,
    pub title: String,
    pub location: Option<String>,
    pub secure_contents: SecureContents,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecureContents {
    pub fields: Vec<Field>,
}

/// A labeled value inside an item's secure contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Field {
    pub designation: Option<String>,
    pub name: Option<String>,
    pub value: Option<String>,
}

/// Username and plaintext password pulled out of an [`Item`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: Option<String>,
    pub password: String,
}

impl Item {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_field(mut self, designation: &str, value: impl Into<String>) -> Self {
        self.secure_contents.fields.push(Field {
            designation: Some(designation.to_string()),
            name: Some(designation.to_string()),
            value: Some(value.into()),
        });
        self
    }

    /// Value of the first field carrying the given designation.
    pub fn designated(&self, designation: &str) -> Option<&str> {
        self.secure_contents
            .fields
            .iter()
            .find(|f| f.designation.as_deref() == Some(designation))
            .and_then(|f| f.value.as_deref())
    }

    /// Returns `None` when the item has no password worth checking.
    pub fn credential(&self) -> Option<Credential> {
        if self.secure_contents.fields.is_empty() {
            return None;
        }

        let password = self.designated("password").filter(|p| !p.is_empty())?;

        Some(Credential {
            username: self.designated("username").map(str::to_string),
            password: password.to_string(),
        })
    }
}
