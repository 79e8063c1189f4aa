//! Material variants and instance identity
//!
//! Materials are a tagged variant over a fixed set of kinds, each exposing
//! the render-affecting fields the fingerprinter hashes. Every instance also
//! carries a process-unique `MaterialId`; for supported kinds the id never
//! participates in fingerprinting, so near-duplicate instances with equal
//! fields are draw-interchangeable.

use std::sync::atomic::{AtomicU64, Ordering};

use super::texture::TextureHandle;

/// Process-unique material instance identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(u64);

static NEXT_MATERIAL_ID: AtomicU64 = AtomicU64::new(1);

impl MaterialId {
    fn next() -> Self {
        Self(NEXT_MATERIAL_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value of the identity
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Discriminant tag over the supported material kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Unlit color/texture material
    Basic,
    /// Standard PBR material
    Standard,
    /// Extended PBR material with transmission and clearcoat
    Physical,
    /// Line rendering material
    Line,
    /// Unknown or unsupported material kind
    Opaque,
}

/// Parameters of a basic unlit material
#[derive(Debug, Clone)]
pub struct BasicParams {
    /// Diffuse color as 0xRRGGBB
    pub color: u32,
    /// Base color texture
    pub map: Option<TextureHandle>,
    /// Alpha mask texture
    pub alpha_map: Option<TextureHandle>,
    /// Whether alpha blending is enabled
    pub transparent: bool,
    /// Overall opacity in [0, 1]
    pub opacity: f32,
}

impl Default for BasicParams {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            map: None,
            alpha_map: None,
            transparent: false,
            opacity: 1.0,
        }
    }
}

/// Parameters of a standard PBR material
#[derive(Debug, Clone)]
pub struct StandardParams {
    /// Albedo color as 0xRRGGBB
    pub color: u32,
    /// Surface roughness in [0, 1]
    pub roughness: f32,
    /// Metalness in [0, 1]
    pub metalness: f32,
    /// Albedo texture
    pub map: Option<TextureHandle>,
    /// Tangent-space normal map
    pub normal_map: Option<TextureHandle>,
    /// Roughness texture
    pub roughness_map: Option<TextureHandle>,
    /// Metalness texture
    pub metalness_map: Option<TextureHandle>,
}

impl Default for StandardParams {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            roughness: 1.0,
            metalness: 0.0,
            map: None,
            normal_map: None,
            roughness_map: None,
            metalness_map: None,
        }
    }
}

/// Parameters of a physical (extended PBR) material
#[derive(Debug, Clone)]
pub struct PhysicalParams {
    /// Base PBR parameters
    pub standard: StandardParams,
    /// Transmission factor in [0, 1]
    pub transmission: f32,
    /// Index of refraction
    pub ior: f32,
    /// Clearcoat layer intensity in [0, 1]
    pub clearcoat: f32,
    /// Clearcoat layer roughness in [0, 1]
    pub clearcoat_roughness: f32,
}

impl Default for PhysicalParams {
    fn default() -> Self {
        Self {
            standard: StandardParams::default(),
            transmission: 0.0,
            ior: 1.5,
            clearcoat: 0.0,
            clearcoat_roughness: 0.0,
        }
    }
}

/// Parameters of a line material
#[derive(Debug, Clone)]
pub struct LineParams {
    /// Line color as 0xRRGGBB
    pub color: u32,
    /// Line width in pixels
    pub line_width: f32,
}

impl Default for LineParams {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            line_width: 1.0,
        }
    }
}

/// Kind-specific material parameters
#[derive(Debug, Clone)]
pub enum MaterialParams {
    /// Unlit color/texture material
    Basic(BasicParams),
    /// Standard PBR material
    Standard(StandardParams),
    /// Extended PBR material
    Physical(PhysicalParams),
    /// Line rendering material
    Line(LineParams),
    /// Unknown material kind; fingerprinted by instance identity so it never
    /// merges with any other material
    Opaque,
}

/// Material instance: kind-specific parameters plus identity
#[derive(Debug, Clone)]
pub struct Material {
    /// Kind-specific render-affecting fields
    pub params: MaterialParams,
    /// Process-unique instance identity
    pub id: MaterialId,
    /// Optional name for debugging
    pub name: Option<String>,
}

impl Material {
    fn with_params(params: MaterialParams) -> Self {
        Self {
            params,
            id: MaterialId::next(),
            name: None,
        }
    }

    /// Create a basic unlit material
    pub fn basic(params: BasicParams) -> Self {
        Self::with_params(MaterialParams::Basic(params))
    }

    /// Create a standard PBR material
    pub fn standard(params: StandardParams) -> Self {
        Self::with_params(MaterialParams::Standard(params))
    }

    /// Create a physical material
    pub fn physical(params: PhysicalParams) -> Self {
        Self::with_params(MaterialParams::Physical(params))
    }

    /// Create a line material
    pub fn line(params: LineParams) -> Self {
        Self::with_params(MaterialParams::Line(params))
    }

    /// Create an opaque material standing in for an unknown kind
    pub fn opaque() -> Self {
        Self::with_params(MaterialParams::Opaque)
    }

    /// Set the material name for debugging
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Get the discriminant tag for this material
    pub fn kind(&self) -> MaterialKind {
        match self.params {
            MaterialParams::Basic(_) => MaterialKind::Basic,
            MaterialParams::Standard(_) => MaterialKind::Standard,
            MaterialParams::Physical(_) => MaterialKind::Physical,
            MaterialParams::Line(_) => MaterialKind::Line,
            MaterialParams::Opaque => MaterialKind::Opaque,
        }
    }

    /// Whether this is a line-family material
    ///
    /// Line materials are excluded from batching in all cases and always take
    /// the per-instance path.
    pub fn is_line(&self) -> bool {
        self.kind() == MaterialKind::Line
    }
}
