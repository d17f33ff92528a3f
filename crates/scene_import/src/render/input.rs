//! Material input expressions
//!
//! A layered material binds each of its inputs to a small expression tree. Leaves
//! are constants or texture samplers; inner nodes are the `pow` operator used for
//! gamma correction and the `remap` operator used to decode normal maps.
//!
//! Trees are built bottom-up from already constructed children and every node
//! owns its children, so a tree can never contain a cycle and is never shared
//! between two materials.

use crate::foundation::math::{utils, Vec2, Vec3};
use crate::render::texture::TextureHandle;

/// Value producer bound to a material input
#[derive(Debug, Clone, PartialEq)]
pub enum InputExpression {
    /// Constant scalar
    ConstantFloat(f32),
    /// Constant 3-vector
    ConstantFloat3(Vec3),
    /// Color/value lookup of a scene texture at the shading point's UV
    Sampler(TextureHandle),
    /// Lookup of a scene texture holding a tangent-space normal map
    BumpSampler(TextureHandle),
    /// Component-wise `base ^ exponent`
    Pow {
        /// Value being raised
        base: Box<InputExpression>,
        /// Exponent
        exponent: Box<InputExpression>,
    },
    /// Affine remap of `data` from range `[from.x, from.y]` to `[to.x, to.y]`
    Remap {
        /// Source range endpoints
        from: Box<InputExpression>,
        /// Target range endpoints
        to: Box<InputExpression>,
        /// Value being remapped
        data: Box<InputExpression>,
    },
}

impl InputExpression {
    /// Scalar constant leaf
    pub fn constant_float(value: f32) -> Self {
        Self::ConstantFloat(value)
    }

    /// 3-vector constant leaf
    pub fn constant_float3(value: Vec3) -> Self {
        Self::ConstantFloat3(value)
    }

    /// Texture sampler leaf
    pub fn sampler(texture: TextureHandle) -> Self {
        Self::Sampler(texture)
    }

    /// Normal-map sampler leaf
    pub fn bump_sampler(texture: TextureHandle) -> Self {
        Self::BumpSampler(texture)
    }

    /// `base ^ exponent` with a scalar constant exponent
    pub fn pow(base: InputExpression, exponent: f32) -> Self {
        Self::Pow {
            base: Box::new(base),
            exponent: Box::new(Self::ConstantFloat(exponent)),
        }
    }

    /// Remap `data` between two constant ranges
    pub fn remap(from: Vec3, to: Vec3, data: InputExpression) -> Self {
        Self::Remap {
            from: Box::new(Self::ConstantFloat3(from)),
            to: Box::new(Self::ConstantFloat3(to)),
            data: Box::new(data),
        }
    }

    /// Sampler of a color texture, gamma corrected when `gamma` is given
    pub fn color_texture(texture: TextureHandle, gamma: Option<f32>) -> Self {
        match gamma {
            Some(exponent) => Self::pow(Self::sampler(texture), exponent),
            None => Self::sampler(texture),
        }
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        match self {
            Self::ConstantFloat(_)
            | Self::ConstantFloat3(_)
            | Self::Sampler(_)
            | Self::BumpSampler(_) => 1,
            Self::Pow { base, exponent } => 1 + base.node_count() + exponent.node_count(),
            Self::Remap { from, to, data } => {
                1 + from.node_count() + to.node_count() + data.node_count()
            }
        }
    }

    /// Textures read anywhere in the tree, in depth-first order
    pub fn textures(&self) -> Vec<TextureHandle> {
        let mut out = Vec::new();
        self.collect_textures(&mut out);
        out
    }

    fn collect_textures(&self, out: &mut Vec<TextureHandle>) {
        match self {
            Self::ConstantFloat(_) | Self::ConstantFloat3(_) => {}
            Self::Sampler(texture) | Self::BumpSampler(texture) => out.push(*texture),
            Self::Pow { base, exponent } => {
                base.collect_textures(out);
                exponent.collect_textures(out);
            }
            Self::Remap { from, to, data } => {
                from.collect_textures(out);
                to.collect_textures(out);
                data.collect_textures(out);
            }
        }
    }

    /// Value of the expression at `uv`
    ///
    /// Scalars are splatted to 3-vectors. `sample` returns the texel of a texture
    /// at a UV coordinate.
    pub fn evaluate<F>(&self, uv: Vec2, sample: &F) -> Vec3
    where
        F: Fn(TextureHandle, Vec2) -> Vec3,
    {
        match self {
            Self::ConstantFloat(value) => Vec3::repeat(*value),
            Self::ConstantFloat3(value) => *value,
            Self::Sampler(texture) | Self::BumpSampler(texture) => sample(*texture, uv),
            Self::Pow { base, exponent } => {
                utils::pow(&base.evaluate(uv, sample), &exponent.evaluate(uv, sample))
            }
            Self::Remap { from, to, data } => {
                let from = from.evaluate(uv, sample);
                let to = to.evaluate(uv, sample);
                let value = data.evaluate(uv, sample);
                let scale = (to.y - to.x) / (from.y - from.x);
                value.map(|v| (v - from.x) * scale + to.x)
            }
        }
    }
}
