//! Markup events as delivered by a streaming tokenizer

use std::collections::HashMap;

/// Attributes of one opened element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(HashMap<String, String>);

impl Attributes {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Whether the whitespace-separated `class` attribute contains `class_name`
    pub fn has_class(&self, class_name: &str) -> bool {
        self.get("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class_name))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One event of a markup stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent {
    Open { tag: String, attributes: Attributes },
    Characters(String),
    Close,
}

impl MarkupEvent {
    pub fn open<I, K, V>(tag: &str, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Open {
            tag: tag.to_string(),
            attributes: attributes.into_iter().collect(),
        }
    }

    pub fn characters(fragment: &str) -> Self {
        Self::Characters(fragment.to_string())
    }
}

/// Receiver of markup events, called once per event in document order
pub trait MarkupHandler {
    fn open(&mut self, tag: &str, attributes: &Attributes);
    fn characters(&mut self, fragment: &str);
    fn close(&mut self);
}

/// Feed a recorded event sequence to a handler
pub fn replay<'a, H, I>(events: I, handler: &mut H)
where
    H: MarkupHandler + ?Sized,
    I: IntoIterator<Item = &'a MarkupEvent>,
{
    for event in events {
        match event {
            MarkupEvent::Open { tag, attributes } => handler.open(tag, attributes),
            MarkupEvent::Characters(fragment) => handler.characters(fragment),
            MarkupEvent::Close => handler.close(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_membership() {
        let attrs: Attributes = [("class", "jum-item  jum-item-product\tlarge")].into_iter().collect();
        assert!(attrs.has_class("jum-item-product"));
        assert!(attrs.has_class("large"));
        assert!(!attrs.has_class("jum-item-prod"));
        assert!(!Attributes::default().has_class("jum-item"));
    }

    #[derive(Default)]
    struct Trace(Vec<String>);

    impl MarkupHandler for Trace {
        fn open(&mut self, tag: &str, _attributes: &Attributes) {
            self.0.push(format!("<{tag}>"));
        }
        fn characters(&mut self, fragment: &str) {
            self.0.push(fragment.to_string());
        }
        fn close(&mut self) {
            self.0.push("</>".to_string());
        }
    }

    #[test]
    fn test_replay_keeps_order() {
        let events = vec![
            MarkupEvent::open("div", [("class", "a")]),
            MarkupEvent::characters("hi"),
            MarkupEvent::Close,
        ];
        let mut trace = Trace::default();
        replay(&events, &mut trace);
        assert_eq!(trace.0, vec!["<div>", "hi", "</>"]);
    }
}
