//! Geometry descriptors as seen by the filter protocol.

use std::fmt;

use log::debug;

use crate::callback::{FilterFnN, UserPtr};

/// Which query a filter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Closest-hit queries; accepted candidates become the ray's hit.
    Intersection,
    /// Any-hit shadow queries; accepted candidates mark the ray occluded.
    Occlusion,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FilterKind::Intersection => "intersection",
            FilterKind::Occlusion => "occlusion",
        })
    }
}

/// A geometry's filter callbacks and user data.
///
/// Built once and then shared read-only by every thread tracing against the
/// geometry.
#[derive(Clone)]
pub struct Geometry {
    id: u32,
    user_data: UserPtr,
    intersection_filter: Option<FilterFnN>,
    occlusion_filter: Option<FilterFnN>,
}

impl Geometry {
    /// A geometry with id `id` and no filters.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            user_data: UserPtr::null(),
            intersection_filter: None,
            occlusion_filter: None,
        }
    }

    /// Geometry id.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Attach user data, handed to both filters on every call.
    pub fn set_user_data(&mut self, user_data: UserPtr) {
        self.user_data = user_data;
    }

    /// Builder form of [`set_user_data`](Self::set_user_data).
    pub fn with_user_data(mut self, user_data: UserPtr) -> Self {
        self.set_user_data(user_data);
        self
    }

    /// Attached user data.
    pub fn user_data(&self) -> UserPtr {
        self.user_data
    }

    /// Register (or with `None`, remove) the intersection filter.
    pub fn set_intersection_filter(&mut self, filter: Option<FilterFnN>) {
        debug!(
            "geometry {}: intersection filter {}",
            self.id,
            if filter.is_some() { "set" } else { "cleared" }
        );
        self.intersection_filter = filter;
    }

    /// Builder form of [`set_intersection_filter`](Self::set_intersection_filter).
    pub fn with_intersection_filter(mut self, filter: FilterFnN) -> Self {
        self.set_intersection_filter(Some(filter));
        self
    }

    /// Register (or with `None`, remove) the occlusion filter.
    pub fn set_occlusion_filter(&mut self, filter: Option<FilterFnN>) {
        debug!(
            "geometry {}: occlusion filter {}",
            self.id,
            if filter.is_some() { "set" } else { "cleared" }
        );
        self.occlusion_filter = filter;
    }

    /// Builder form of [`set_occlusion_filter`](Self::set_occlusion_filter).
    pub fn with_occlusion_filter(mut self, filter: FilterFnN) -> Self {
        self.set_occlusion_filter(Some(filter));
        self
    }

    /// Registered intersection filter.
    #[inline]
    pub fn intersection_filter(&self) -> Option<FilterFnN> {
        self.intersection_filter
    }

    /// Registered occlusion filter.
    #[inline]
    pub fn occlusion_filter(&self) -> Option<FilterFnN> {
        self.occlusion_filter
    }

    /// Registered filter for `kind`.
    #[inline]
    pub fn filter(&self, kind: FilterKind) -> Option<FilterFnN> {
        match kind {
            FilterKind::Intersection => self.intersection_filter,
            FilterKind::Occlusion => self.occlusion_filter,
        }
    }

    /// Must traversal run the intersection filter for this geometry?
    #[inline]
    pub fn has_intersection_filter(&self) -> bool {
        self.intersection_filter.is_some()
    }

    /// Must traversal run the occlusion filter for this geometry?
    #[inline]
    pub fn has_occlusion_filter(&self) -> bool {
        self.occlusion_filter.is_some()
    }
}

impl fmt::Debug for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Geometry")
            .field("id", &self.id)
            .field("user_data", &self.user_data)
            .field("intersection_filter", &self.intersection_filter.is_some())
            .field("occlusion_filter", &self.occlusion_filter.is_some())
            .finish()
    }
}
