//! The [`XmpTag`] handle: one XMP property, addressed by key, with a typed
//! value backed by its raw text form.

use anyhow::{Result, bail};
use std::cell::RefCell;
use std::rc::Rc;

use crate::codec::{parse_value, serialize_value};
use crate::value::{XmpType, XmpValue};

/// Write access to the metadata container a tag belongs to.
///
/// Implementations push raw text straight into the underlying store and
/// surface write failures (e.g. a closed file) unchanged — the tag never
/// swallows them.
pub trait MetadataStore {
    /// Store `raw` as the text form of the property `key`.
    fn set_tag(&mut self, key: &str, raw: &str) -> Result<()>;

    /// Remove the property `key` from the container.
    fn delete_tag(&mut self, key: &str) -> Result<()>;
}

/// A single XMP property bound to a metadata key.
///
/// The cached raw text is the single source of truth: reads re-parse it on
/// every call, and writes serialize the new value before touching any state,
/// so a failed write leaves the tag unchanged. A tag may be bound to a
/// [`MetadataStore`] after construction; from then on writes and deletes are
/// propagated to the store under the tag's key.
///
/// Tags are not synchronized: a cached-text update and its store
/// propagation form one logical step, so concurrent mutation of one tag
/// must be serialized by the caller.
pub struct XmpTag {
    key: String,
    name: String,
    label: String,
    description: String,
    xtype: XmpType,
    raw: Option<String>,
    store: Option<Rc<RefCell<dyn MetadataStore>>>,
}

impl XmpTag {
    /// Create a tag for `key`, optionally seeded with its raw text form as
    /// read from the container.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
        xtype: XmpType,
        initial: Option<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            label: label.into(),
            description: description.into(),
            xtype,
            raw: initial,
            store: None,
        }
    }

    /// The fully-qualified key, e.g. `Xmp.xmp.ModifyDate`.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn xmp_type(&self) -> XmpType {
        self.xtype
    }

    /// Whether the tag currently holds a value.
    pub fn has_value(&self) -> bool {
        self.raw.is_some()
    }

    /// Attach the metadata store this tag belongs to.
    ///
    /// Binding does not push the current value; only subsequent writes and
    /// deletes propagate.
    pub fn bind(&mut self, store: Rc<RefCell<dyn MetadataStore>>) {
        self.store = Some(store);
    }

    /// Parse the cached text into a typed value.
    ///
    /// Fails when the tag is unset — an unset value is distinguishable from
    /// any parsed value, empty ones included.
    pub fn get_value(&self) -> Result<XmpValue> {
        match &self.raw {
            Some(raw) => Ok(parse_value(raw, self.xtype)?),
            None => bail!("tag {} has no value", self.key),
        }
    }

    /// Serialize `value` and make it the tag's current value.
    ///
    /// The text form is computed first; if serialization fails the tag is
    /// untouched. On success the new text is pushed to the bound store (if
    /// any) under the tag's key and becomes the cached value. Store errors
    /// surface unchanged.
    pub fn set_value(&mut self, value: &XmpValue) -> Result<()> {
        let raw = serialize_value(value, self.xtype)?;
        log::debug!("set {} = {raw:?}", self.key);
        if let Some(store) = &self.store {
            store.borrow_mut().set_tag(&self.key, &raw)?;
        }
        self.raw = Some(raw);
        Ok(())
    }

    /// Clear the tag's value and, when a store is bound, remove the key
    /// from the container. Deleting an already-unset value is a no-op on
    /// the tag itself but still forwards to the store.
    pub fn delete_value(&mut self) -> Result<()> {
        log::debug!("delete {}", self.key);
        self.raw = None;
        if let Some(store) = &self.store {
            store.borrow_mut().delete_tag(&self.key)?;
        }
        Ok(())
    }

    /// The cached raw text, without parsing. Fails when the tag is unset.
    pub fn to_text(&self) -> Result<&str> {
        match &self.raw {
            Some(raw) => Ok(raw),
            None => bail!("tag {} has no value", self.key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{XmpDateTime, XmpTimestamp};
    use anyhow::anyhow;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MockStore {
        tags: HashMap<String, String>,
    }

    impl MetadataStore for MockStore {
        fn set_tag(&mut self, key: &str, raw: &str) -> Result<()> {
            self.tags.insert(key.to_string(), raw.to_string());
            Ok(())
        }

        fn delete_tag(&mut self, key: &str) -> Result<()> {
            self.tags.remove(key);
            Ok(())
        }
    }

    /// A store whose underlying container can no longer be written.
    struct ClosedStore;

    impl MetadataStore for ClosedStore {
        fn set_tag(&mut self, _key: &str, _raw: &str) -> Result<()> {
            Err(anyhow!("metadata container is closed"))
        }

        fn delete_tag(&mut self, _key: &str) -> Result<()> {
            Err(anyhow!("metadata container is closed"))
        }
    }

    fn modify_date_tag() -> XmpTag {
        XmpTag::new(
            "Xmp.xmp.ModifyDate",
            "ModifyDate",
            "Modify Date",
            "The date and time the resource was last modified.",
            XmpType::Date,
            Some("2005-09-07T15:09:51-07:00".to_string()),
        )
    }

    fn eight_thirty_utc() -> XmpValue {
        XmpValue::Date(XmpDateTime::DateTime(XmpTimestamp {
            date: NaiveDate::from_ymd_opt(2009, 4, 22).unwrap(),
            hour: 8,
            minute: 30,
            second: Some(27),
            microsecond: 0,
            tz_minutes: Some(0),
        }))
    }

    // ── value lifecycle, unbound ─────────────────────────────────────

    #[test]
    fn get_value_parses_initial_text() {
        let tag = modify_date_tag();
        let value = tag.get_value().unwrap();
        assert!(matches!(value, XmpValue::Date(XmpDateTime::DateTime(_))));
    }

    #[test]
    fn set_value_replaces_the_parsed_value() {
        let mut tag = modify_date_tag();
        let old = tag.get_value().unwrap();
        tag.set_value(&eight_thirty_utc()).unwrap();
        assert_ne!(tag.get_value().unwrap(), old);
        assert_eq!(tag.to_text().unwrap(), "2009-04-22T08:30:27Z");
    }

    #[test]
    fn set_value_failure_leaves_state_untouched() {
        let mut tag = modify_date_tag();
        let before = tag.to_text().unwrap().to_string();
        assert!(tag.set_value(&XmpValue::Integer(5)).is_err());
        assert_eq!(tag.to_text().unwrap(), before);
    }

    #[test]
    fn delete_value_unsets_the_tag() {
        let mut tag = modify_date_tag();
        tag.delete_value().unwrap();
        assert!(!tag.has_value());
        assert!(tag.get_value().is_err());
        assert!(tag.to_text().is_err());
    }

    #[test]
    fn delete_value_is_idempotent() {
        let mut tag = modify_date_tag();
        tag.delete_value().unwrap();
        tag.delete_value().unwrap();
        assert!(!tag.has_value());
    }

    #[test]
    fn get_value_on_unset_tag_fails() {
        let tag = XmpTag::new(
            "Xmp.dc.format",
            "format",
            "Format",
            "The file format.",
            XmpType::MimeType,
            None,
        );
        assert!(!tag.has_value());
        assert!(tag.get_value().is_err());
    }

    // ── store propagation ────────────────────────────────────────────

    #[test]
    fn set_value_propagates_to_bound_store() {
        let store = Rc::new(RefCell::new(MockStore::default()));
        let mut tag = modify_date_tag();
        tag.bind(store.clone());
        tag.set_value(&eight_thirty_utc()).unwrap();
        assert_eq!(
            store.borrow().tags.get("Xmp.xmp.ModifyDate").map(String::as_str),
            Some("2009-04-22T08:30:27Z")
        );
    }

    #[test]
    fn bind_alone_pushes_nothing() {
        let store = Rc::new(RefCell::new(MockStore::default()));
        let mut tag = modify_date_tag();
        tag.bind(store.clone());
        assert!(store.borrow().tags.is_empty());
    }

    #[test]
    fn delete_value_removes_key_from_store() {
        let store = Rc::new(RefCell::new(MockStore::default()));
        let mut tag = modify_date_tag();
        store
            .borrow_mut()
            .set_tag(tag.key(), tag.to_text().unwrap())
            .unwrap();
        tag.bind(store.clone());

        tag.delete_value().unwrap();
        assert!(!tag.has_value());
        assert!(!store.borrow().tags.contains_key("Xmp.xmp.ModifyDate"));
    }

    #[test]
    fn bind_after_deletion_does_not_resurrect_the_key() {
        let store = Rc::new(RefCell::new(MockStore::default()));
        let mut tag = modify_date_tag();
        tag.delete_value().unwrap();
        tag.bind(store.clone());
        assert!(store.borrow().tags.is_empty());
    }

    #[test]
    fn store_write_failure_surfaces_from_set_value() {
        let mut tag = modify_date_tag();
        tag.bind(Rc::new(RefCell::new(ClosedStore)));
        let err = tag.set_value(&eight_thirty_utc()).unwrap_err();
        assert!(err.to_string().contains("closed"));
    }

    // ── identity ─────────────────────────────────────────────────────

    #[test]
    fn accessors_expose_identity() {
        let tag = modify_date_tag();
        assert_eq!(tag.key(), "Xmp.xmp.ModifyDate");
        assert_eq!(tag.name(), "ModifyDate");
        assert_eq!(tag.label(), "Modify Date");
        assert!(tag.description().contains("last modified"));
        assert_eq!(tag.xmp_type(), XmpType::Date);
    }
}
