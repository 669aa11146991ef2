//! Ghost and evidence reference tables.

use strum::{Display, EnumIter, EnumString, FromRepr, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, EnumIter, EnumString, IntoStaticStr, Display,
)]
#[repr(u8)]
pub enum GhostType {
    Spirit = 0,
    Wraith = 1,
    Phantom = 2,
    Poltergeist = 3,
    Banshee = 4,
    Jinn = 5,
    Mare = 6,
    Revenant = 7,
    Shade = 8,
    Demon = 9,
    Yurei = 10,
    Oni = 11,
    Yokai = 12,
    Hantu = 13,
    Goryo = 14,
    Myling = 15,
    Onryo = 16,
    #[strum(serialize = "The Twins")]
    TheTwins = 17,
    Raiju = 18,
    Obake = 19,
    #[strum(serialize = "The Mimic")]
    TheMimic = 20,
    Moroi = 21,
    Deogen = 22,
    Thaye = 23,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr, Display,
)]
pub enum Evidence {
    #[strum(serialize = "EMF Level 5")]
    Emf5,
    #[strum(serialize = "Spirit Box")]
    SpiritBox,
    #[strum(serialize = "Ghost Writing")]
    GhostWriting,
    Fingerprints,
    #[strum(serialize = "Freezing Temperatures")]
    FreezingTemperatures,
    #[strum(serialize = "Ghost Orb")]
    GhostOrb,
    #[strum(serialize = "D.O.T.S Projector")]
    DotsProjector,
}

impl GhostType {
    /// Selection chart layout, three ghosts per row
    pub const CHART: [[GhostType; 3]; 8] = [
        [Self::Spirit, Self::Wraith, Self::Phantom],
        [Self::Poltergeist, Self::Banshee, Self::Jinn],
        [Self::Mare, Self::Revenant, Self::Shade],
        [Self::Demon, Self::Yurei, Self::Oni],
        [Self::Yokai, Self::Hantu, Self::Goryo],
        [Self::Myling, Self::Onryo, Self::TheTwins],
        [Self::Raiju, Self::Obake, Self::TheMimic],
        [Self::Moroi, Self::Deogen, Self::Thaye],
    ];

    /// Map the raw in-memory value to a ghost type.
    pub fn from_value(value: i32) -> Option<Self> {
        u8::try_from(value).ok().and_then(Self::from_repr)
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Evidence this ghost leaves.
    ///
    /// The Mimic's list includes the Ghost Orb it always shows in addition to
    /// its three regular evidences.
    pub fn evidence(&self) -> &'static [Evidence] {
        use Evidence::*;
        match self {
            Self::Spirit => &[Emf5, SpiritBox, GhostWriting],
            Self::Wraith => &[Emf5, SpiritBox, DotsProjector],
            Self::Phantom => &[SpiritBox, DotsProjector, Fingerprints],
            Self::Poltergeist => &[SpiritBox, GhostWriting, Fingerprints],
            Self::Banshee => &[DotsProjector, Fingerprints, GhostOrb],
            Self::Jinn => &[Emf5, FreezingTemperatures, Fingerprints],
            Self::Mare => &[GhostOrb, SpiritBox, GhostWriting],
            Self::Revenant => &[FreezingTemperatures, GhostWriting, GhostOrb],
            Self::Shade => &[Emf5, FreezingTemperatures, GhostWriting],
            Self::Demon => &[FreezingTemperatures, Fingerprints, GhostWriting],
            Self::Yurei => &[FreezingTemperatures, DotsProjector, GhostOrb],
            Self::Oni => &[Emf5, DotsProjector, FreezingTemperatures],
            Self::Yokai => &[SpiritBox, GhostOrb, DotsProjector],
            Self::Hantu => &[FreezingTemperatures, Fingerprints, GhostOrb],
            Self::Goryo => &[Emf5, DotsProjector, Fingerprints],
            Self::Myling => &[Emf5, Fingerprints, GhostWriting],
            Self::Onryo => &[SpiritBox, FreezingTemperatures, GhostOrb],
            Self::TheTwins => &[Emf5, SpiritBox, FreezingTemperatures],
            Self::Raiju => &[Emf5, DotsProjector, GhostOrb],
            Self::Obake => &[Emf5, Fingerprints, GhostOrb],
            Self::TheMimic => &[SpiritBox, Fingerprints, FreezingTemperatures, GhostOrb],
            Self::Moroi => &[SpiritBox, GhostWriting, FreezingTemperatures],
            Self::Deogen => &[SpiritBox, GhostWriting, DotsProjector],
            Self::Thaye => &[GhostOrb, GhostWriting, DotsProjector],
        }
    }

    pub fn has_evidence(&self, evidence: Evidence) -> bool {
        self.evidence().contains(&evidence)
    }
}

impl Evidence {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}
