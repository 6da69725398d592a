use serde::Serialize;

/// Structural and architectural element kinds the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElementKind {
    Column,
    Beam,
    Member,
    Plate,
    Footing,
    Pile,
    Wall,
    Slab,
    CurtainWall,
    Roof,
    Stair,
    Railing,
}

impl ElementKind {
    /// Every kind, in element table order.
    pub const ALL: [ElementKind; 12] = [
        ElementKind::Column,
        ElementKind::Beam,
        ElementKind::Member,
        ElementKind::Plate,
        ElementKind::Footing,
        ElementKind::Pile,
        ElementKind::Wall,
        ElementKind::Slab,
        ElementKind::CurtainWall,
        ElementKind::Roof,
        ElementKind::Stair,
        ElementKind::Railing,
    ];

    /// Maps a STEP type tag to a kind. Standard-case subtypes fold into their parent.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "IFCCOLUMN" | "IFCCOLUMNSTANDARDCASE" => ElementKind::Column,
            "IFCBEAM" | "IFCBEAMSTANDARDCASE" => ElementKind::Beam,
            "IFCMEMBER" | "IFCMEMBERSTANDARDCASE" => ElementKind::Member,
            "IFCPLATE" | "IFCPLATESTANDARDCASE" => ElementKind::Plate,
            "IFCFOOTING" => ElementKind::Footing,
            "IFCPILE" => ElementKind::Pile,
            "IFCWALL" | "IFCWALLSTANDARDCASE" => ElementKind::Wall,
            "IFCSLAB" | "IFCSLABSTANDARDCASE" => ElementKind::Slab,
            "IFCCURTAINWALL" => ElementKind::CurtainWall,
            "IFCROOF" => ElementKind::Roof,
            "IFCSTAIR" => ElementKind::Stair,
            "IFCRAILING" => ElementKind::Railing,
            _ => return None,
        };
        Some(kind)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ElementKind::Column => "Column",
            ElementKind::Beam => "Beam",
            ElementKind::Member => "Member",
            ElementKind::Plate => "Plate",
            ElementKind::Footing => "Footing",
            ElementKind::Pile => "Pile",
            ElementKind::Wall => "Wall",
            ElementKind::Slab => "Slab",
            ElementKind::CurtainWall => "CurtainWall",
            ElementKind::Roof => "Roof",
            ElementKind::Stair => "Stair",
            ElementKind::Railing => "Railing",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the element table: a structural element at its world position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedElement {
    pub kind: ElementKind,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub id: u64,
    pub global_id: String,
}
