/// The six cube faces in the order they are stored inside a cubemap asset.
///
/// Every serialized asset is face-major in exactly this order, so the
/// ordering contract lives here rather than in the call sites.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    pub const COUNT: usize = 6;

    pub const ALL: [Self; Self::COUNT] = [
        Self::PositiveX,
        Self::NegativeX,
        Self::PositiveY,
        Self::NegativeY,
        Self::PositiveZ,
        Self::NegativeZ,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::PositiveX => 0,
            Self::NegativeX => 1,
            Self::PositiveY => 2,
            Self::NegativeY => 3,
            Self::PositiveZ => 4,
            Self::NegativeZ => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Conventional file stem used by cube-face export tools.
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::PositiveX => "px",
            Self::NegativeX => "nx",
            Self::PositiveY => "py",
            Self::NegativeY => "ny",
            Self::PositiveZ => "pz",
            Self::NegativeZ => "nz",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_order_is_stable() {
        let stems: Vec<_> = CubeFace::ALL.iter().map(|face| face.file_stem()).collect();
        assert_eq!(stems, ["px", "nx", "py", "ny", "pz", "nz"]);
        for (index, face) in CubeFace::ALL.iter().enumerate() {
            assert_eq!(face.index(), index);
            assert_eq!(CubeFace::from_index(index), Some(*face));
        }
        assert_eq!(CubeFace::from_index(6), None);
    }
}
