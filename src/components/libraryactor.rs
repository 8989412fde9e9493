use bevy_ecs::prelude::Component;

/// Actor instantiated by the host from its artifact library.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct LibraryActor {
    /// Library artifact id, e.g. `artifact:1765608764049719385`.
    pub resource_id: String,
    /// Display name shown by the host.
    pub name: String,
}

impl LibraryActor {
    pub fn new(resource_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            name: name.into(),
        }
    }
}
