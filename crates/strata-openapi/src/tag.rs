//! Tag metadata for grouping operations in API documentation.
//!
//! Documentation UIs show one group per tag, in the order the tag list
//! declares them. Declaring tags as an enum and deriving the list from it
//! keeps route annotations and the list in sync.
//!
//! ```rust,ignore
//! #[derive(Clone, Copy)]
//! enum Tags { Accounts, Orders, Products }
//!
//! impl ApiTag for Tags {
//!     const ALL: &'static [Self] = &[Self::Accounts, Self::Orders, Self::Products];
//!
//!     fn name(&self) -> &'static str {
//!         match self {
//!             Self::Accounts => "Accounts",
//!             Self::Orders => "Orders",
//!             Self::Products => "Products",
//!         }
//!     }
//! }
//!
//! let tags = TagList::from_enum::<Tags>()?;
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{OpenApiError, OpenApiResult};

/// Link to documentation outside the API reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalDocs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
}

/// One entry of the OpenAPI `tags` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub name: String,
    /// Markdown is rendered by most documentation UIs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
}

impl Tag {
    /// A tag with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            external_docs: None,
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Links external documentation.
    pub fn external_docs(mut self, url: impl Into<String>, description: Option<&str>) -> Self {
        self.external_docs = Some(ExternalDocs {
            description: description.map(str::to_string),
            url: url.into(),
        });
        self
    }
}

/// An enumeration of the tags an API uses.
pub trait ApiTag: Copy + 'static {
    /// Every tag, in documentation order.
    const ALL: &'static [Self];

    /// Display name, used both on routes and in the tag list.
    fn name(&self) -> &'static str;

    /// Full metadata for this tag. Defaults to the bare name.
    fn metadata(&self) -> Tag {
        Tag::new(self.name())
    }
}

/// Ordered, duplicate-free list of tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagList {
    tags: Vec<Tag>,
}

impl TagList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the list from a tag enumeration, preserving declaration order.
    pub fn from_enum<T: ApiTag>() -> OpenApiResult<Self> {
        Self::from_tags(T::ALL.iter().map(ApiTag::metadata))
    }

    /// Builds the list from tags, preserving order.
    pub fn from_tags(tags: impl IntoIterator<Item = Tag>) -> OpenApiResult<Self> {
        let mut list = Self::new();
        for tag in tags {
            list.push(tag)?;
        }
        Ok(list)
    }

    /// Appends a tag, rejecting a name already present.
    pub fn push(&mut self, tag: Tag) -> OpenApiResult<()> {
        if self.tags.iter().any(|t| t.name == tag.name) {
            return Err(OpenApiError::DuplicateTag(tag.name));
        }
        self.tags.push(tag);
        Ok(())
    }

    /// Tag names in order.
    pub fn names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }

    /// Iterates tags in order.
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns true if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, Copy)]
    enum Tags {
        Accounts,
        Orders,
        Products,
    }

    impl ApiTag for Tags {
        const ALL: &'static [Self] = &[Self::Accounts, Self::Orders, Self::Products];

        fn name(&self) -> &'static str {
            match self {
                Self::Accounts => "Accounts",
                Self::Orders => "Orders",
                Self::Products => "Products",
            }
        }

        fn metadata(&self) -> Tag {
            let tag = Tag::new(self.name());
            match self {
                Self::Accounts => tag
                    .description("An account allows a *customer* to **log in**.")
                    .external_docs("https://example.net/admin/users/", Some("User Management")),
                Self::Orders => tag.description("An order is a **collection of products**."),
                Self::Products => tag,
            }
        }
    }

    #[test]
    fn test_enum_order_is_documentation_order() {
        let tags = TagList::from_enum::<Tags>().unwrap();
        assert_eq!(tags.names(), ["Accounts", "Orders", "Products"]);
    }

    #[test]
    fn test_serialized_shape() {
        let tags = TagList::from_enum::<Tags>().unwrap();
        assert_eq!(
            serde_json::to_value(&tags).unwrap(),
            json!([
                {
                    "name": "Accounts",
                    "description": "An account allows a *customer* to **log in**.",
                    "externalDocs": {
                        "description": "User Management",
                        "url": "https://example.net/admin/users/"
                    }
                },
                {
                    "name": "Orders",
                    "description": "An order is a **collection of products**."
                },
                { "name": "Products" }
            ])
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = TagList::from_tags([Tag::new("Orders"), Tag::new("Orders")]);
        assert!(matches!(result, Err(OpenApiError::DuplicateTag(name)) if name == "Orders"));
    }
}
