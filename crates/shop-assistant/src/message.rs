//! Chat message types.

use serde::{Deserialize, Serialize};
use shop_commerce::{Catalog, MessageId, Product, ProductId};

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "ai", alias = "assistant")]
    Assistant,
}

/// Discriminator for non-text message payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// A grid of recommended products.
    #[serde(rename = "product-grid")]
    ProductGrid,
}

/// A single chat entry.
///
/// Either carries text, or is a product recommendation carrying ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MessageKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<ProductId>>,
}

impl Message {
    /// A text message from the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self::text(Role::User, text)
    }

    /// A text message from the assistant.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::text(Role::Assistant, text)
    }

    /// An assistant recommendation carrying product ids.
    pub fn product_grid(products: Vec<ProductId>) -> Self {
        Self {
            id: MessageId::generate(),
            role: Role::Assistant,
            text: None,
            kind: Some(MessageKind::ProductGrid),
            products: Some(products),
        }
    }

    fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: MessageId::generate(),
            role,
            text: Some(text.into()),
            kind: None,
            products: None,
        }
    }

    pub fn is_recommendation(&self) -> bool {
        self.kind == Some(MessageKind::ProductGrid)
    }

    /// Recommended ids, empty for text messages.
    pub fn recommended_ids(&self) -> &[ProductId] {
        match (&self.kind, &self.products) {
            (Some(MessageKind::ProductGrid), Some(ids)) => ids,
            _ => &[],
        }
    }

    /// Recommended products that exist in the catalog.
    pub fn recommended_products<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        catalog.resolve(self.recommended_ids())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_persisted_shapes() {
        let text: Message =
            serde_json::from_str(r#"{"id":"m1","role":"user","text":"hello"}"#).unwrap();
        assert_eq!(text.role, Role::User);
        assert!(!text.is_recommendation());
        assert!(text.recommended_ids().is_empty());

        let grid: Message = serde_json::from_str(
            r#"{"id":"m2","role":"ai","type":"product-grid","products":["p1","p5"]}"#,
        )
        .unwrap();
        assert_eq!(grid.role, Role::Assistant);
        assert_eq!(grid.recommended_ids(), &[ProductId::new("p1"), ProductId::new("p5")]);
    }

    #[test]
    fn test_assistant_alias_accepted() {
        let msg: Message =
            serde_json::from_str(r#"{"id":"m3","role":"assistant","text":"hi"}"#).unwrap();
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(serde_json::to_value(&msg).unwrap()["role"], "ai");
    }

    #[test]
    fn test_text_message_omits_empty_fields() {
        let value = serde_json::to_value(Message::user("hi")).unwrap();
        assert!(value.get("type").is_none());
        assert!(value.get("products").is_none());
    }
}
