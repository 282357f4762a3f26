//! Stable per-token accent colour, icon and size.
//!
//! Derived from a hash of the token's id so a card keeps its look across
//! re-renders without storing anything.

use serde::Serialize;

use crate::market::token::TokenRecord;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub name: &'static str,
    pub accent: &'static str,
    pub ring: &'static str,
    /// ANSI foreground colour code.
    pub ansi: u8,
}

pub const PALETTES: [Palette; 6] = [
    Palette { name: "emerald", accent: "text-emerald-400", ring: "ring-emerald-500/40", ansi: 32 },
    Palette { name: "rose", accent: "text-rose-400", ring: "ring-rose-500/40", ansi: 31 },
    Palette { name: "blue", accent: "text-blue-400", ring: "ring-blue-500/40", ansi: 34 },
    Palette { name: "amber", accent: "text-amber-400", ring: "ring-amber-500/40", ansi: 33 },
    Palette { name: "violet", accent: "text-violet-400", ring: "ring-violet-500/40", ansi: 35 },
    Palette { name: "cyan", accent: "text-cyan-400", ring: "ring-cyan-500/40", ansi: 36 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantIcon {
    Leaf,
    Rocket,
    Zap,
    Flame,
    Gem,
    Star,
}

impl VariantIcon {
    pub const ALL: [VariantIcon; 6] = [
        VariantIcon::Leaf,
        VariantIcon::Rocket,
        VariantIcon::Zap,
        VariantIcon::Flame,
        VariantIcon::Gem,
        VariantIcon::Star,
    ];

    pub fn glyph(&self) -> char {
        match self {
            VariantIcon::Leaf => '♣',
            VariantIcon::Rocket => '▲',
            VariantIcon::Zap => 'ϟ',
            VariantIcon::Flame => '♨',
            VariantIcon::Gem => '◆',
            VariantIcon::Star => '★',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IconSize {
    Small,
    Medium,
    Large,
}

impl IconSize {
    pub const ALL: [IconSize; 3] = [IconSize::Small, IconSize::Medium, IconSize::Large];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayVariant {
    pub palette: Palette,
    pub icon: VariantIcon,
    pub size: IconSize,
}

/// 32-bit FNV-1a.
pub fn fnv1a(input: &str) -> u32 {
    input.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Variant for a key; palette, icon and size read different bytes of the hash.
pub fn select(key: &str) -> DisplayVariant {
    let hash = fnv1a(key) as usize;
    DisplayVariant {
        palette: PALETTES[hash % PALETTES.len()],
        icon: VariantIcon::ALL[(hash >> 8) % VariantIcon::ALL.len()],
        size: IconSize::ALL[(hash >> 16) % IconSize::ALL.len()],
    }
}

/// Keyed on `id`, or on `symbol` when the id is blank.
pub fn for_token(token: &TokenRecord) -> DisplayVariant {
    if token.id.trim().is_empty() {
        select(&token.symbol)
    } else {
        select(&token.id)
    }
}
