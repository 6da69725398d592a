pub mod placement;

pub use placement::{
    compose, local_transform, PlacementArena, PlacementNode, PlacementResolver, ResolvedPlacement,
    Resolution,
};
