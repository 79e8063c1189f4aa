//! Content-derived material fingerprints
//!
//! A fingerprint is computed purely from a material's render-affecting
//! fields, so two distinct instances with identical fields hash equal and
//! can share one draw-call unit. Instance identity and transforms never
//! participate. The field tuple per kind is fixed in code, which removes
//! any field-enumeration-order nondeterminism.
//!
//! Texture fields contribute their handle identity, never pixel content.
//!
//! Unknown kinds hash their kind tag plus instance identity: such materials
//! never match anything else, so a missed merge is the worst that can
//! happen, never a wrong one.

use std::hash::{Hash, Hasher};

use fxhash::FxHasher;

use crate::scene::{Material, MaterialParams, StandardParams};

/// Content-derived key over a material's render-affecting fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Raw hash value
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

// Variant tags keep equal field values in different kinds from colliding.
const TAG_BASIC: u8 = 0;
const TAG_STANDARD: u8 = 1;
const TAG_PHYSICAL: u8 = 2;
const TAG_LINE: u8 = 3;
const TAG_OPAQUE: u8 = 4;

/// Compute the fingerprint of a material
pub fn fingerprint(material: &Material) -> Fingerprint {
    let mut hasher = FxHasher::default();

    match &material.params {
        MaterialParams::Basic(p) => {
            TAG_BASIC.hash(&mut hasher);
            p.color.hash(&mut hasher);
            p.map.hash(&mut hasher);
            p.alpha_map.hash(&mut hasher);
            p.transparent.hash(&mut hasher);
            p.opacity.to_bits().hash(&mut hasher);
        }
        MaterialParams::Standard(p) => {
            TAG_STANDARD.hash(&mut hasher);
            hash_standard(&mut hasher, p);
        }
        MaterialParams::Physical(p) => {
            TAG_PHYSICAL.hash(&mut hasher);
            hash_standard(&mut hasher, &p.standard);
            p.transmission.to_bits().hash(&mut hasher);
            p.ior.to_bits().hash(&mut hasher);
            p.clearcoat.to_bits().hash(&mut hasher);
            p.clearcoat_roughness.to_bits().hash(&mut hasher);
        }
        MaterialParams::Line(p) => {
            TAG_LINE.hash(&mut hasher);
            p.color.hash(&mut hasher);
            p.line_width.to_bits().hash(&mut hasher);
        }
        MaterialParams::Opaque => {
            TAG_OPAQUE.hash(&mut hasher);
            material.id.hash(&mut hasher);
        }
    }

    Fingerprint(hasher.finish())
}

fn hash_standard(hasher: &mut FxHasher, p: &StandardParams) {
    p.color.hash(hasher);
    p.roughness.to_bits().hash(hasher);
    p.metalness.to_bits().hash(hasher);
    p.map.hash(hasher);
    p.normal_map.hash(hasher);
    p.roughness_map.hash(hasher);
    p.metalness_map.hash(hasher);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{
        BasicParams, LineParams, PhysicalParams, TextureDesc, TextureRegistry,
    };

    fn red_standard() -> Material {
        Material::standard(StandardParams {
            color: 0xff0000,
            roughness: 0.5,
            metalness: 0.0,
            ..StandardParams::default()
        })
    }

    #[test]
    fn test_identical_fields_hash_equal() {
        // Two distinct instances, same render-affecting fields
        let a = red_standard();
        let b = red_standard().with_name("other instance");
        assert_ne!(a.id, b.id);
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_construction_order_is_irrelevant() {
        // Populate the same fields in different textual order
        let a = Material::standard(StandardParams {
            metalness: 0.25,
            color: 0x00ff00,
            roughness: 0.75,
            ..StandardParams::default()
        });
        let b = Material::standard(StandardParams {
            color: 0x00ff00,
            roughness: 0.75,
            metalness: 0.25,
            ..StandardParams::default()
        });
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_differing_field_changes_fingerprint() {
        let a = red_standard();
        let b = Material::standard(StandardParams {
            color: 0xff0000,
            roughness: 0.6,
            metalness: 0.0,
            ..StandardParams::default()
        });
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_kind_tag_separates_variants() {
        // Same color in different kinds must not collide
        let basic = Material::basic(BasicParams {
            color: 0x123456,
            ..BasicParams::default()
        });
        let line = Material::line(LineParams {
            color: 0x123456,
            line_width: 1.0,
        });
        assert_ne!(fingerprint(&basic), fingerprint(&line));
    }

    #[test]
    fn test_texture_identity_participates() {
        let mut registry = TextureRegistry::new();
        let tex_a = registry.register(TextureDesc::new("a.png", 16, 16));
        let tex_b = registry.register(TextureDesc::new("b.png", 16, 16));

        let with_a = Material::standard(StandardParams {
            map: Some(tex_a),
            ..StandardParams::default()
        });
        let with_b = Material::standard(StandardParams {
            map: Some(tex_b),
            ..StandardParams::default()
        });
        let with_a_again = Material::standard(StandardParams {
            map: Some(tex_a),
            ..StandardParams::default()
        });

        assert_ne!(fingerprint(&with_a), fingerprint(&with_b));
        assert_eq!(fingerprint(&with_a), fingerprint(&with_a_again));
    }

    #[test]
    fn test_physical_extends_standard_fields() {
        let standard = Material::standard(StandardParams::default());
        let physical = Material::physical(PhysicalParams::default());
        assert_ne!(fingerprint(&standard), fingerprint(&physical));

        let thin = Material::physical(PhysicalParams {
            transmission: 0.9,
            ..PhysicalParams::default()
        });
        assert_ne!(fingerprint(&physical), fingerprint(&thin));
    }

    #[test]
    fn test_opaque_never_matches_anything() {
        let a = Material::opaque();
        let b = Material::opaque();
        assert_ne!(fingerprint(&a), fingerprint(&b));
        // Stable for the same instance
        assert_eq!(fingerprint(&a), fingerprint(&a));
    }

    #[test]
    fn test_fingerprint_is_stable_across_calls() {
        let material = red_standard();
        assert_eq!(fingerprint(&material), fingerprint(&material));
    }
}
