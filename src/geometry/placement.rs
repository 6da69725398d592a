//! Placement resolution: local coordinate chains → world positions.
//!
//! Every IFCLOCALPLACEMENT is decoded once into an arena of [`PlacementNode`]s
//! whose parents are arena indices. Resolving an element walks its chain up to
//! the root, then composes the local transforms root-to-leaf so rotations of
//! ancestors carry through to the translations of their descendants.

use std::collections::HashMap;

use nalgebra::{Matrix4, Point3, Vector3};

use crate::config::{PlacementStrategy, TakeoffConfig};
use crate::error::{GeometryError, PlacementError};
use crate::parser::{EntityStore, StepEntity, StepValue};

/// One decoded IFCLOCALPLACEMENT.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementNode {
    pub id: u64,
    pub translation: Vector3<f64>,
    /// Local Z axis; world Z when absent.
    pub axis: Option<Vector3<f64>>,
    /// Local X axis hint; world X when absent.
    pub ref_direction: Option<Vector3<f64>>,
    /// Arena index of the parent placement; `None` for placements relative to the root.
    pub parent: Option<usize>,
}

impl PlacementNode {
    #[must_use]
    pub fn rooted(id: u64, translation: Vector3<f64>) -> Self {
        Self {
            id,
            translation,
            axis: None,
            ref_direction: None,
            parent: None,
        }
    }
}

/// Homogeneous transform of a single node relative to its parent.
///
/// Z comes from the axis, X from the reference direction, Y = Z × X and X is then
/// re-derived as Y × Z, so the basis is orthonormal even for sloppy input.
pub fn local_transform(node: &PlacementNode) -> Result<Matrix4<f64>, GeometryError> {
    let z = node.axis.unwrap_or_else(Vector3::z);
    let x_hint = node.ref_direction.unwrap_or_else(|| default_ref_direction(&z));

    let y = z.cross(&x_hint);
    let x = y.cross(&z);

    let degenerate = GeometryError::NonFiniteBasis { placement: node.id };
    let x = x.try_normalize(f64::EPSILON).ok_or_else(|| degenerate.clone())?;
    let y = y.try_normalize(f64::EPSILON).ok_or_else(|| degenerate.clone())?;
    let z = z.try_normalize(f64::EPSILON).ok_or_else(|| degenerate.clone())?;
    let t = node.translation;

    let matrix = Matrix4::new(
        x.x, y.x, z.x, t.x, //
        x.y, y.y, z.y, t.y, //
        x.z, y.z, z.z, t.z, //
        0.0, 0.0, 0.0, 1.0,
    );

    if matrix.iter().all(|v| v.is_finite()) {
        Ok(matrix)
    } else {
        Err(degenerate)
    }
}

/// World X, unless the local Z already points along world X; then world Y.
fn default_ref_direction(z: &Vector3<f64>) -> Vector3<f64> {
    let x = Vector3::x();
    if z.cross(&x).norm() <= f64::EPSILON * z.norm().max(1.0) {
        Vector3::y()
    } else {
        x
    }
}

/// Composes local transforms ordered root first: `world = parent * child`.
pub fn compose<I>(root_to_leaf: I) -> Matrix4<f64>
where
    I: IntoIterator<Item = Matrix4<f64>>,
{
    root_to_leaf
        .into_iter()
        .fold(Matrix4::identity(), |world, local| world * local)
}

/// All placement nodes of one model, addressed by index.
#[derive(Debug, Default)]
pub struct PlacementArena {
    nodes: Vec<Result<PlacementNode, PlacementError>>,
    index: HashMap<u64, usize>,
}

impl PlacementArena {
    #[must_use]
    pub fn build(store: &EntityStore) -> Self {
        let index: HashMap<u64, usize> = store
            .entities_of_type("IFCLOCALPLACEMENT")
            .enumerate()
            .map(|(i, entity)| (entity.id, i))
            .collect();

        let nodes = store
            .entities_of_type("IFCLOCALPLACEMENT")
            .map(|entity| decode_local_placement(store, entity, &index))
            .collect();

        Self { nodes, index }
    }

    /// Arena from already decoded nodes. A parent index outside `nodes` makes every
    /// chain through it fail with [`PlacementError::ParentOutOfRange`].
    #[must_use]
    pub fn from_nodes(nodes: Vec<PlacementNode>) -> Self {
        let index = nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();
        Self {
            nodes: nodes.into_iter().map(Ok).collect(),
            index,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn index_of(&self, placement_id: u64) -> Option<usize> {
        self.index.get(&placement_id).copied()
    }

    /// True when every decodable placement hangs directly off the root.
    #[must_use]
    pub fn all_rooted(&self) -> bool {
        self.nodes
            .iter()
            .all(|node| matches!(node, Ok(PlacementNode { parent: None, .. })))
    }

    fn node(&self, index: usize) -> Result<&PlacementNode, PlacementError> {
        match self.nodes.get(index) {
            Some(Ok(node)) => Ok(node),
            Some(Err(err)) => Err(err.clone()),
            None => Err(PlacementError::ParentOutOfRange { index }),
        }
    }

    /// Nodes from the root down to `leaf`.
    fn chain(&self, leaf: usize, bound: usize) -> Result<Vec<&PlacementNode>, ChainFault> {
        let mut chain = Vec::new();
        let mut cursor = Some(leaf);

        while let Some(index) = cursor {
            if chain.len() >= bound {
                let placement = self.node(leaf).map_or(0, |n| n.id);
                return Err(ChainFault::Geometry(GeometryError::DepthExceeded {
                    placement,
                    bound,
                }));
            }
            let node = self.node(index).map_err(ChainFault::Placement)?;
            chain.push(node);
            cursor = node.parent;
        }

        chain.reverse();
        Ok(chain)
    }
}

enum ChainFault {
    Placement(PlacementError),
    Geometry(GeometryError),
}

/// IFCLOCALPLACEMENT(PlacementRelTo, RelativePlacement)
fn decode_local_placement(
    store: &EntityStore,
    entity: &StepEntity,
    index: &HashMap<u64, usize>,
) -> Result<PlacementNode, PlacementError> {
    let parent = match entity.get(0) {
        None | Some(StepValue::Null) => None,
        Some(StepValue::Reference(target)) => match index.get(target) {
            Some(&i) => Some(i),
            None => return Err(non_placement(store, entity.id, *target)),
        },
        Some(_) => {
            return Err(PlacementError::MalformedAttribute {
                id: entity.id,
                attribute: "PlacementRelTo",
            })
        }
    };

    let relative_id = entity
        .get_ref(1)
        .ok_or(PlacementError::MalformedAttribute {
            id: entity.id,
            attribute: "RelativePlacement",
        })?;
    let relative = store
        .get(relative_id)
        .ok_or(PlacementError::DanglingReference {
            from: entity.id,
            target: relative_id,
        })?;

    // IFCAXIS2PLACEMENT3D(Location, Axis, RefDirection)
    // IFCAXIS2PLACEMENT2D(Location, RefDirection)
    let (axis, ref_direction) = match relative.entity_type.as_str() {
        "IFCAXIS2PLACEMENT3D" => (
            optional_direction(store, relative, 1)?,
            optional_direction(store, relative, 2)?,
        ),
        "IFCAXIS2PLACEMENT2D" => (None, optional_direction(store, relative, 1)?),
        other => {
            return Err(PlacementError::NotAPlacement {
                id: relative.id,
                found: other.to_string(),
            })
        }
    };

    let location_id = relative
        .get_ref(0)
        .ok_or(PlacementError::MalformedAttribute {
            id: relative.id,
            attribute: "Location",
        })?;
    let translation = triple(store, relative.id, location_id, "IFCCARTESIANPOINT", "Location")?;

    Ok(PlacementNode {
        id: entity.id,
        translation,
        axis,
        ref_direction,
        parent,
    })
}

fn non_placement(store: &EntityStore, from: u64, target: u64) -> PlacementError {
    match store.get(target) {
        Some(found) => PlacementError::NotAPlacement {
            id: target,
            found: found.entity_type.clone(),
        },
        None => PlacementError::DanglingReference { from, target },
    }
}

fn optional_direction(
    store: &EntityStore,
    placement: &StepEntity,
    index: usize,
) -> Result<Option<Vector3<f64>>, PlacementError> {
    match placement.get(index) {
        None | Some(StepValue::Null) => Ok(None),
        Some(StepValue::Reference(id)) => {
            triple(store, placement.id, *id, "IFCDIRECTION", "Direction").map(Some)
        }
        Some(_) => Err(PlacementError::MalformedAttribute {
            id: placement.id,
            attribute: "Direction",
        }),
    }
}

/// Reads the coordinate list of an IFCCARTESIANPOINT / IFCDIRECTION. 2D values get z = 0.
fn triple(
    store: &EntityStore,
    from: u64,
    id: u64,
    expected: &str,
    attribute: &'static str,
) -> Result<Vector3<f64>, PlacementError> {
    let entity = store
        .get(id)
        .ok_or(PlacementError::DanglingReference { from, target: id })?;
    if !entity.is_a(expected) {
        return Err(PlacementError::NotAPlacement {
            id,
            found: entity.entity_type.clone(),
        });
    }

    let coords: Vec<f64> = entity
        .get_list(0)
        .unwrap_or_default()
        .iter()
        .filter_map(StepValue::as_float)
        .collect();

    match coords.as_slice() {
        [x, y] => Ok(Vector3::new(*x, *y, 0.0)),
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => Err(PlacementError::MalformedAttribute { id, attribute }),
    }
}

/// Outcome of resolving one element's placement.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Placed(ResolvedPlacement),
    /// The element has no placement at all, which is not the same as the origin.
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlacement {
    /// World position in metres.
    pub position: Point3<f64>,
    /// Set when part of the chain was replaced by identity.
    pub recovered: Option<GeometryError>,
}

pub struct PlacementResolver<'a> {
    store: &'a EntityStore,
    arena: PlacementArena,
    max_depth: usize,
    strategy: PlacementStrategy,
    length_scale: f64,
}

impl<'a> PlacementResolver<'a> {
    #[must_use]
    pub fn new(store: &'a EntityStore, config: &TakeoffConfig) -> Self {
        let arena = PlacementArena::build(store);
        let mut strategy = config.placement_strategy;
        if strategy == PlacementStrategy::RootedFastPath && !arena.all_rooted() {
            tracing::debug!("nested placements present, using hierarchical resolution");
            strategy = PlacementStrategy::Hierarchical;
        }

        Self {
            store,
            arena,
            max_depth: config.max_placement_depth,
            strategy,
            length_scale: store.length_scale(),
        }
    }

    #[must_use]
    pub fn arena(&self) -> &PlacementArena {
        &self.arena
    }

    #[must_use]
    pub fn strategy(&self) -> PlacementStrategy {
        self.strategy
    }

    /// Resolves the placement referenced by `owner` to a world position.
    pub fn resolve(&self, owner: u64, placement: Option<u64>) -> Result<Resolution, PlacementError> {
        let Some(placement_id) = placement else {
            return Ok(Resolution::Missing);
        };
        let leaf = self
            .arena
            .index_of(placement_id)
            .ok_or_else(|| non_placement(self.store, owner, placement_id))?;

        let (world, recovered) = match self.strategy {
            PlacementStrategy::RootedFastPath => {
                // Rooted node: its local transform is already the world transform.
                let node = self.arena.node(leaf)?;
                let mut recovered = None;
                let world = recover_local(node, &mut recovered);
                (world, recovered)
            }
            PlacementStrategy::Hierarchical => self.world_transform(leaf)?,
        };

        let scale = self.length_scale;
        let position = Point3::new(world[(0, 3)] * scale, world[(1, 3)] * scale, world[(2, 3)] * scale);
        Ok(Resolution::Placed(ResolvedPlacement {
            position,
            recovered,
        }))
    }

    /// Full chain composition. Geometry faults are replaced by identity and reported
    /// alongside the matrix; only structural faults are returned as errors.
    fn world_transform(
        &self,
        leaf: usize,
    ) -> Result<(Matrix4<f64>, Option<GeometryError>), PlacementError> {
        let mut recovered = None;

        let world = match self.arena.chain(leaf, self.max_depth) {
            Ok(chain) => compose(
                chain
                    .into_iter()
                    .map(|node| recover_local(node, &mut recovered)),
            ),
            Err(ChainFault::Geometry(err)) => {
                tracing::warn!(%err, "placement chain discarded, using origin");
                recovered = Some(err);
                Matrix4::identity()
            }
            Err(ChainFault::Placement(err)) => return Err(err),
        };

        Ok((world, recovered))
    }
}

/// Local transform, or identity when the basis is degenerate; the fault is kept in `recovered`.
fn recover_local(node: &PlacementNode, recovered: &mut Option<GeometryError>) -> Matrix4<f64> {
    local_transform(node).unwrap_or_else(|err| {
        tracing::warn!(%err, "substituting identity transform");
        *recovered = Some(err);
        Matrix4::identity()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_relative_eq, relative_eq};

    fn node(id: u64, t: [f64; 3], axis: Option<[f64; 3]>, ref_dir: Option<[f64; 3]>, parent: Option<usize>) -> PlacementNode {
        PlacementNode {
            id,
            translation: Vector3::from(t),
            axis: axis.map(Vector3::from),
            ref_direction: ref_dir.map(Vector3::from),
            parent,
        }
    }

    fn store(data: &str) -> EntityStore {
        let content = format!("FILE_SCHEMA(('IFC4'));DATA;{data}ENDSEC;");
        EntityStore::from_bytes(content.as_bytes()).unwrap()
    }

    fn placed(resolution: Resolution) -> ResolvedPlacement {
        match resolution {
            Resolution::Placed(p) => p,
            Resolution::Missing => panic!("expected a placement"),
        }
    }

    #[test]
    fn depth_one_chain_is_its_own_local_transform() {
        let n = node(1, [1.5, -2.0, 7.0], Some([0.0, 1.0, 1.0]), Some([1.0, 0.0, 0.0]), None);
        let local = local_transform(&n).unwrap();
        assert_eq!(compose([local]), local);
    }

    #[test]
    fn chain_equals_manually_flattened_transform() {
        // Storey rotated 90° about Z, then a grid offset, then a lift.
        let storey = node(1, [1.0, 0.0, 0.0], None, Some([0.0, 1.0, 0.0]), None);
        let grid = node(2, [2.0, 0.0, 0.0], None, None, Some(0));
        let lift = node(3, [0.0, 0.0, 3.0], None, None, Some(1));

        let locals: Vec<Matrix4<f64>> = [&storey, &grid, &lift]
            .iter()
            .map(|n| local_transform(n).unwrap())
            .collect();
        let composed = compose(locals.clone());

        // Net effect: translate to (1, 2, 3) with the storey's 90° rotation.
        let flattened = local_transform(&node(9, [1.0, 2.0, 3.0], None, Some([0.0, 1.0, 0.0]), None)).unwrap();
        assert_relative_eq!(composed, flattened, epsilon = 1e-12);

        let left = (locals[0] * locals[1]) * locals[2];
        let right = locals[0] * (locals[1] * locals[2]);
        assert_relative_eq!(left, right, epsilon = 1e-12);
        assert_relative_eq!(composed, left, epsilon = 1e-12);
    }

    #[test]
    fn sloppy_axes_yield_orthonormal_basis() {
        let pairs = [
            ([0.0, 0.0, 2.0], [1.0, 1.0, 0.3]),
            ([0.2, -0.1, 5.0], [3.0, 0.0, 0.0]),
            ([1.0, 1.0, 1.0], [0.0, 0.0, 1.0]),
            ([-4.0, 0.5, 0.0], [0.0, 2.0, 2.0]),
        ];
        for (axis, ref_dir) in pairs {
            let m = local_transform(&node(1, [0.0; 3], Some(axis), Some(ref_dir), None)).unwrap();
            let x = m.fixed_view::<3, 1>(0, 0).into_owned();
            let y = m.fixed_view::<3, 1>(0, 1).into_owned();
            let z = m.fixed_view::<3, 1>(0, 2).into_owned();
            for v in [&x, &y, &z] {
                assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-12);
            }
            assert!(relative_eq!(x.dot(&y), 0.0, epsilon = 1e-12));
            assert!(relative_eq!(y.dot(&z), 0.0, epsilon = 1e-12));
            assert!(relative_eq!(z.dot(&x), 0.0, epsilon = 1e-12));
            // Z keeps the direction of the declared axis.
            assert_relative_eq!(z, Vector3::from(axis).normalize(), epsilon = 1e-12);
        }
    }

    #[test]
    fn axis_along_world_x_without_ref_direction_is_not_degenerate() {
        let m = local_transform(&node(1, [0.0; 3], Some([1.0, 0.0, 0.0]), None, None)).unwrap();
        assert!(m.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn zero_axis_is_a_geometry_error() {
        let err = local_transform(&node(4, [0.0; 3], Some([0.0, 0.0, 0.0]), None, None)).unwrap_err();
        assert_eq!(err, GeometryError::NonFiniteBasis { placement: 4 });

        let err = local_transform(&node(5, [0.0; 3], Some([0.0, 0.0, 1.0]), Some([0.0, 0.0, -3.0]), None))
            .unwrap_err();
        assert_eq!(err, GeometryError::NonFiniteBasis { placement: 5 });
    }

    #[test]
    fn column_under_storey_resolves_to_world() {
        let store = store(
            "#1=IFCCARTESIANPOINT((0.,0.,4.));
#2=IFCAXIS2PLACEMENT3D(#1,$,$);
#3=IFCLOCALPLACEMENT($,#2);
#4=IFCCARTESIANPOINT((2.,3.,0.));
#5=IFCAXIS2PLACEMENT3D(#4,$,$);
#6=IFCLOCALPLACEMENT(#3,#5);",
        );
        let resolver = PlacementResolver::new(&store, &TakeoffConfig::default());
        let p = placed(resolver.resolve(100, Some(6)).unwrap());
        assert_relative_eq!(p.position, Point3::new(2.0, 3.0, 4.0), epsilon = 1e-12);
        assert_eq!(p.recovered, None);
    }

    #[test]
    fn parent_rotation_moves_child_translation() {
        let store = store(
            "#1=IFCCARTESIANPOINT((10.,0.,0.));
#2=IFCDIRECTION((0.,1.,0.));
#3=IFCAXIS2PLACEMENT3D(#1,$,#2);
#4=IFCLOCALPLACEMENT($,#3);
#5=IFCCARTESIANPOINT((5.,0.,0.));
#6=IFCAXIS2PLACEMENT2D(#5,$);
#7=IFCLOCALPLACEMENT(#4,#6);",
        );
        let resolver = PlacementResolver::new(&store, &TakeoffConfig::default());
        let p = placed(resolver.resolve(100, Some(7)).unwrap());
        assert_relative_eq!(p.position, Point3::new(10.0, 5.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn missing_placement_is_distinct_from_origin() {
        let store = store(
            "#1=IFCCARTESIANPOINT((0.,0.,0.));
#2=IFCAXIS2PLACEMENT3D(#1,$,$);
#3=IFCLOCALPLACEMENT($,#2);",
        );
        let resolver = PlacementResolver::new(&store, &TakeoffConfig::default());
        assert_eq!(resolver.resolve(100, None).unwrap(), Resolution::Missing);
        let origin = placed(resolver.resolve(100, Some(3)).unwrap());
        assert_eq!(origin.position, Point3::origin());
    }

    #[test]
    fn cyclic_chain_is_recovered_at_origin() {
        let store = store(
            "#1=IFCCARTESIANPOINT((1.,1.,1.));
#2=IFCAXIS2PLACEMENT3D(#1,$,$);
#3=IFCLOCALPLACEMENT(#4,#2);
#4=IFCLOCALPLACEMENT(#3,#2);",
        );
        let config = TakeoffConfig {
            max_placement_depth: 8,
            ..TakeoffConfig::default()
        };
        let resolver = PlacementResolver::new(&store, &config);
        let p = placed(resolver.resolve(100, Some(3)).unwrap());
        assert_eq!(p.position, Point3::origin());
        assert_eq!(
            p.recovered,
            Some(GeometryError::DepthExceeded { placement: 3, bound: 8 })
        );
    }

    #[test]
    fn degenerate_node_is_replaced_by_identity() {
        let store = store(
            "#1=IFCCARTESIANPOINT((0.,0.,4.));
#2=IFCDIRECTION((0.,0.,0.));
#3=IFCAXIS2PLACEMENT3D(#1,#2,$);
#4=IFCLOCALPLACEMENT($,#3);
#5=IFCCARTESIANPOINT((2.,3.,0.));
#6=IFCAXIS2PLACEMENT3D(#5,$,$);
#7=IFCLOCALPLACEMENT(#4,#6);",
        );
        let resolver = PlacementResolver::new(&store, &TakeoffConfig::default());
        let p = placed(resolver.resolve(100, Some(7)).unwrap());
        assert_relative_eq!(p.position, Point3::new(2.0, 3.0, 0.0), epsilon = 1e-12);
        assert_eq!(p.recovered, Some(GeometryError::NonFiniteBasis { placement: 4 }));
    }

    #[test]
    fn structural_faults_are_errors() {
        let store = store(
            "#1=IFCCARTESIANPOINT((0.,0.,0.));
#2=IFCAXIS2PLACEMENT3D(#1,$,$);
#3=IFCLOCALPLACEMENT(#99,#2);
#4=IFCLOCALPLACEMENT($,#1);",
        );
        let resolver = PlacementResolver::new(&store, &TakeoffConfig::default());
        assert_eq!(
            resolver.resolve(100, Some(3)).unwrap_err(),
            PlacementError::DanglingReference { from: 3, target: 99 }
        );
        assert!(matches!(
            resolver.resolve(100, Some(4)),
            Err(PlacementError::NotAPlacement { id: 1, .. })
        ));
        assert!(matches!(
            resolver.resolve(100, Some(2)),
            Err(PlacementError::NotAPlacement { id: 2, .. })
        ));
        assert_eq!(
            resolver.resolve(100, Some(42)).unwrap_err(),
            PlacementError::DanglingReference { from: 100, target: 42 }
        );
    }

    #[test]
    fn fast_path_only_applies_to_flat_models() {
        let flat = store(
            "#1=IFCCARTESIANPOINT((3.,4.,5.));
#2=IFCAXIS2PLACEMENT3D(#1,$,$);
#3=IFCLOCALPLACEMENT($,#2);",
        );
        let config = TakeoffConfig {
            placement_strategy: PlacementStrategy::RootedFastPath,
            ..TakeoffConfig::default()
        };
        let fast = PlacementResolver::new(&flat, &config);
        assert_eq!(fast.strategy(), PlacementStrategy::RootedFastPath);
        assert_eq!(fast.arena().len(), 1);
        let slow = PlacementResolver::new(&flat, &TakeoffConfig::default());
        assert_eq!(
            fast.resolve(100, Some(3)).unwrap(),
            slow.resolve(100, Some(3)).unwrap()
        );

        let nested = store(
            "#1=IFCCARTESIANPOINT((0.,0.,4.));
#2=IFCAXIS2PLACEMENT3D(#1,$,$);
#3=IFCLOCALPLACEMENT($,#2);
#4=IFCLOCALPLACEMENT(#3,#2);",
        );
        let resolver = PlacementResolver::new(&nested, &config);
        assert_eq!(resolver.strategy(), PlacementStrategy::Hierarchical);
        let p = placed(resolver.resolve(100, Some(4)).unwrap());
        assert_relative_eq!(p.position, Point3::new(0.0, 0.0, 8.0), epsilon = 1e-12);
    }

    #[test]
    fn arena_from_nodes_resolves_by_index() {
        let arena = PlacementArena::from_nodes(vec![
            PlacementNode::rooted(10, Vector3::new(0.0, 0.0, 1.0)),
            node(11, [1.0, 0.0, 0.0], None, None, Some(0)),
        ]);
        assert_eq!(arena.len(), 2);
        assert!(!arena.all_rooted());
        assert_eq!(arena.index_of(11), Some(1));
        let chain = match arena.chain(1, 4) {
            Ok(chain) => chain.iter().map(|n| n.id).collect::<Vec<_>>(),
            Err(_) => panic!("chain should resolve"),
        };
        assert_eq!(chain, vec![10, 11]);
    }

    #[test]
    fn out_of_range_parent_is_an_error() {
        let arena = PlacementArena::from_nodes(vec![node(10, [0.0, 0.0, 1.0], None, None, Some(7))]);
        assert!(matches!(
            arena.chain(0, 4),
            Err(ChainFault::Placement(PlacementError::ParentOutOfRange { index: 7 }))
        ));
    }

    #[test]
    fn strategies_agree_on_degenerate_rooted_node() {
        let flat = store(
            "#1=IFCCARTESIANPOINT((5.,6.,7.));
#2=IFCDIRECTION((0.,0.,0.));
#3=IFCAXIS2PLACEMENT3D(#1,#2,$);
#4=IFCLOCALPLACEMENT($,#3);",
        );
        let fast_config = TakeoffConfig {
            placement_strategy: PlacementStrategy::RootedFastPath,
            ..TakeoffConfig::default()
        };
        let fast = PlacementResolver::new(&flat, &fast_config);
        let slow = PlacementResolver::new(&flat, &TakeoffConfig::default());
        assert_eq!(fast.strategy(), PlacementStrategy::RootedFastPath);

        let fast_placed = placed(fast.resolve(100, Some(4)).unwrap());
        let slow_placed = placed(slow.resolve(100, Some(4)).unwrap());
        assert_eq!(fast_placed, slow_placed);
        assert_eq!(
            fast_placed.recovered,
            Some(GeometryError::NonFiniteBasis { placement: 4 })
        );
    }
}
