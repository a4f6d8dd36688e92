//! Enumeration types used throughout the analysis.

use serde::{Deserialize, Serialize};

/// Weapon category of a held or fired weapon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponClass {
    Pistol,
    Smg,
    #[default]
    Rifle,
    Sniper,
    Shotgun,
    MachineGun,
    Knife,
    Grenade,
    Bomb,
    Other,
}

/// Body region struck by a damage event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitGroup {
    Head,
    Chest,
    Stomach,
    Arm,
    Leg,
    #[default]
    Generic,
}

/// Outcome of the backward field-of-view search for one engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngagementStatus {
    /// Target entered the cone inside the look-back window.
    Tracked,
    /// Target was already in the cone at the window floor.
    PreAim,
    /// Target never entered the cone before the event.
    Untracked,
    /// Actor was not alive at the event tick.
    Invalid,
}

/// Discrete suspicion band derived from the composite score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuspicionLevel {
    #[default]
    Clean,
    Low,
    Medium,
    High,
}

/// Scored signal families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MetricFamily {
    Reaction,
    Snap,
    HeadshotConsistency,
    Accuracy,
    SmokeKills,
}

impl WeaponClass {
    /// Classify a raw engine weapon name (`weapon_ak47`, `knife_t`, `inferno`, ...).
    pub fn from_name(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        let name = name.strip_prefix("weapon_").unwrap_or(name.as_str());

        if name.contains("knife") || name.contains("bayonet") {
            return WeaponClass::Knife;
        }
        if name.contains("grenade")
            || name.contains("flashbang")
            || name.contains("molotov")
            || name.contains("decoy")
            || name.contains("inferno")
            || name.contains("nade")
        {
            return WeaponClass::Grenade;
        }
        if name == "c4" || name.contains("bomb") {
            return WeaponClass::Bomb;
        }

        match name {
            "glock" | "hkp2000" | "usp_silencer" | "p250" | "fiveseven" | "tec9" | "cz75a"
            | "deagle" | "revolver" | "elite" => WeaponClass::Pistol,
            "mac10" | "mp9" | "mp7" | "mp5sd" | "ump45" | "p90" | "bizon" => WeaponClass::Smg,
            "ak47" | "m4a1" | "m4a1_silencer" | "galilar" | "famas" | "sg556" | "aug" => {
                WeaponClass::Rifle
            }
            "awp" | "ssg08" | "scar20" | "g3sg1" => WeaponClass::Sniper,
            "nova" | "xm1014" | "sawedoff" | "mag7" => WeaponClass::Shotgun,
            "m249" | "negev" => WeaponClass::MachineGun,
            _ => WeaponClass::Other,
        }
    }

    /// Whether shots from this weapon count toward aim metrics.
    pub fn is_firearm(&self) -> bool {
        matches!(
            self,
            WeaponClass::Pistol
                | WeaponClass::Smg
                | WeaponClass::Rifle
                | WeaponClass::Sniper
                | WeaponClass::Shotgun
                | WeaponClass::MachineGun
        )
    }
}

impl HitGroup {
    pub fn is_head(&self) -> bool {
        matches!(self, HitGroup::Head)
    }
}

impl SuspicionLevel {
    /// Band for a composite score. Scores above 100 fall in `High`.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=14 => SuspicionLevel::Clean,
            15..=29 => SuspicionLevel::Low,
            30..=59 => SuspicionLevel::Medium,
            _ => SuspicionLevel::High,
        }
    }
}

impl MetricFamily {
    pub const ALL: [MetricFamily; 5] = [
        MetricFamily::Reaction,
        MetricFamily::Snap,
        MetricFamily::HeadshotConsistency,
        MetricFamily::Accuracy,
        MetricFamily::SmokeKills,
    ];
}
