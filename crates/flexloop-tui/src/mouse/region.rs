//! Clickable regions registered during a render pass

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use tracing::trace;

use crate::event::{Interaction, MouseEvent};
use crate::geometry::{Point, Rect};

/// Turns a mouse event into an optional application message
pub type RegionHandler<M> = Box<dyn Fn(&MouseEvent) -> Option<M> + Send>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RegionId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for RegionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for RegionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A rectangle that reacts to the pointer
///
/// Regions live for one frame: the registry is cleared before each render and
/// the application registers them again from `view`.
pub struct MouseRegion<M> {
    id: RegionId,
    area: Rect,
    z_index: i32,
    handlers: HashMap<Interaction, RegionHandler<M>>,
}

impl<M> MouseRegion<M> {
    pub fn new(id: impl Into<RegionId>, area: Rect) -> Self {
        Self {
            id: id.into(),
            area,
            z_index: 0,
            handlers: HashMap::new(),
        }
    }

    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Install the handler for one interaction, replacing any previous one
    pub fn on<F>(mut self, interaction: Interaction, handler: F) -> Self
    where
        F: Fn(&MouseEvent) -> Option<M> + Send + 'static,
    {
        self.handlers.insert(interaction, Box::new(handler));
        self
    }

    /// Emit a fixed message for an interaction
    pub fn on_message(self, interaction: Interaction, message: M) -> Self
    where
        M: Clone + Send + 'static,
    {
        self.on(interaction, move |_| Some(message.clone()))
    }

    pub fn on_click<F>(self, handler: F) -> Self
    where
        F: Fn(&MouseEvent) -> Option<M> + Send + 'static,
    {
        self.on(Interaction::Click, handler)
    }

    pub fn id(&self) -> &RegionId {
        &self.id
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn z(&self) -> i32 {
        self.z_index
    }

    pub fn handles(&self, interaction: Interaction) -> bool {
        self.handlers.contains_key(&interaction)
    }

    /// Run the handler for this event's interaction; missing handlers yield nothing
    pub fn dispatch(&self, event: &MouseEvent) -> Option<M> {
        self.handlers
            .get(&event.kind.interaction())
            .and_then(|handler| handler(event))
    }
}

impl<M> fmt::Debug for MouseRegion<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MouseRegion")
            .field("id", &self.id)
            .field("area", &self.area)
            .field("z_index", &self.z_index)
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Regions registered for the current frame
pub struct RegionRegistry<M> {
    regions: Vec<MouseRegion<M>>,
}

impl<M> RegionRegistry<M> {
    pub fn new() -> Self {
        Self {
            regions: Vec::new(),
        }
    }

    /// Add `region` for this frame
    ///
    /// Ids are unique within a frame: registering an id again replaces the
    /// earlier region, so hit testing and dispatch by id always agree.
    pub fn register(&mut self, region: MouseRegion<M>) {
        if let Some(index) = self.regions.iter().position(|r| r.id == region.id) {
            trace!(id = %region.id, "region registered twice, replacing");
            self.regions.remove(index);
        }
        self.regions.push(region);
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Topmost region containing `point`.
    ///
    /// Higher z-index wins; among equal z-indices the region registered last
    /// was drawn last and wins.
    pub fn hit_test(&self, point: Point) -> Option<&MouseRegion<M>> {
        self.regions
            .iter()
            .enumerate()
            .filter(|(_, region)| region.area.contains(point))
            .max_by_key(|(order, region)| (region.z_index, *order))
            .map(|(_, region)| region)
    }

    pub fn get<Q>(&self, id: &Q) -> Option<&MouseRegion<M>>
    where
        RegionId: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.regions
            .iter()
            .rev()
            .find(|region| Borrow::<Q>::borrow(&region.id) == id)
    }

    /// Dispatch to the region with this id, if it is still registered
    pub fn dispatch(&self, id: &RegionId, event: &MouseEvent) -> Option<M> {
        self.get(id).and_then(|region| region.dispatch(event))
    }

    pub fn iter(&self) -> impl Iterator<Item = &MouseRegion<M>> {
        self.regions.iter()
    }
}

impl<M> Default for RegionRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for RegionRegistry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.regions.iter()).finish()
    }
}
