use std::collections::BTreeMap;
use std::fmt;

use log::{debug, trace};

use crate::error::{GalleryError, Result};

/// Stable identifier of an interactive object, assigned by the loading layer
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Opaque, non-owning handle to a visual proxy owned by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProxyHandle(pub u64);

/// What kind of thing an interactive object is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Card,
    Frame,
    Jukebox,
    Avatar,
    Phone,
    ContactLink,
    SecurityCamera,
}

/// Click resolution order, highest priority first
pub const CLICK_PRIORITY: [Category; 6] = [
    Category::Card,
    Category::Frame,
    Category::Jukebox,
    Category::Phone,
    Category::SecurityCamera,
    Category::ContactLink,
];

/// Project metadata shown by the modal when a frame or card is clicked
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectInfo {
    pub title: String,
    pub description: String,
    pub url: String,
}

/// Contact links exposed as named sub-parts of the phone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactKind {
    Github,
    Linkedin,
    Mail,
}

impl ContactKind {
    /// Resolve a phone sub-part name as exported by the model
    pub fn from_part_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "github" => Some(ContactKind::Github),
            "linkedin" => Some(ContactKind::Linkedin),
            "mail" | "email" => Some(ContactKind::Mail),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Payload {
    #[default]
    None,
    Project(ProjectInfo),
    Contact(ContactKind),
}

/// Interaction metadata for one registered object
#[derive(Debug, Clone, PartialEq)]
pub struct InteractiveObject {
    pub id: ObjectId,
    category: Category,
    pub proxy: ProxyHandle,
    pub payload: Payload,
}

impl InteractiveObject {
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn project(&self) -> Option<&ProjectInfo> {
        match &self.payload {
            Payload::Project(info) => Some(info),
            _ => None,
        }
    }

    pub fn contact(&self) -> Option<ContactKind> {
        match self.payload {
            Payload::Contact(kind) => Some(kind),
            _ => None,
        }
    }
}

/// Typed registry of every interactive object currently in the scene.
///
/// Populated by the loading layer as assets stream in. Iteration order is
/// the identifier order, so picking ties resolve deterministically.
#[derive(Debug, Default)]
pub struct InteractiveObjectRegistry {
    objects: BTreeMap<ObjectId, InteractiveObject>,
}

impl InteractiveObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new object.
    ///
    /// Fails with [`GalleryError::DuplicateId`] if the identifier is taken;
    /// the existing entry is left untouched.
    pub fn register(
        &mut self,
        id: impl Into<ObjectId>,
        category: Category,
        proxy: ProxyHandle,
        payload: Payload,
    ) -> Result<()> {
        let id = id.into();
        if self.objects.contains_key(&id) {
            return Err(GalleryError::DuplicateId(id.to_string()));
        }

        debug!("Registered {:?} '{}' with proxy {:?}", category, id, proxy);
        self.objects.insert(
            id.clone(),
            InteractiveObject {
                id,
                category,
                proxy,
                payload,
            },
        );
        Ok(())
    }

    /// Remove an object; absent identifiers are ignored
    pub fn unregister(&mut self, id: &ObjectId) {
        if self.objects.remove(id).is_some() {
            debug!("Unregistered '{}'", id);
        } else {
            trace!("Unregister of unknown id '{}' ignored", id);
        }
    }

    pub fn lookup(&self, id: &ObjectId) -> Result<&InteractiveObject> {
        self.objects
            .get(id)
            .ok_or_else(|| GalleryError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InteractiveObject> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = InteractiveObjectRegistry::new();
        registry
            .register("F1", Category::Frame, ProxyHandle(1), Payload::None)
            .unwrap();

        let object = registry.lookup(&ObjectId::new("F1")).unwrap();
        assert_eq!(object.category(), Category::Frame);
        assert_eq!(object.proxy, ProxyHandle(1));
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = InteractiveObjectRegistry::new();
        registry
            .register("jukebox", Category::Jukebox, ProxyHandle(1), Payload::None)
            .unwrap();

        let err = registry
            .register("jukebox", Category::Frame, ProxyHandle(2), Payload::None)
            .unwrap_err();
        assert_eq!(err, GalleryError::DuplicateId("jukebox".into()));
        assert_eq!(registry.len(), 1);

        // original entry survives with its category unchanged
        let object = registry.lookup(&"jukebox".into()).unwrap();
        assert_eq!(object.category(), Category::Jukebox);
        assert_eq!(object.proxy, ProxyHandle(1));
    }

    #[test]
    fn test_unregister_missing_is_noop() {
        let mut registry = InteractiveObjectRegistry::new();
        registry.unregister(&"ghost".into());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lookup_missing_is_not_found() {
        let registry = InteractiveObjectRegistry::new();
        assert_eq!(
            registry.lookup(&"F9".into()).unwrap_err(),
            GalleryError::NotFound("F9".into())
        );
    }

    #[test]
    fn test_contact_part_names() {
        assert_eq!(ContactKind::from_part_name("GitHub"), Some(ContactKind::Github));
        assert_eq!(ContactKind::from_part_name("mail"), Some(ContactKind::Mail));
        assert_eq!(ContactKind::from_part_name("screen"), None);
    }
}
