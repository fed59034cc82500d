//! Local transforms of scene nodes and their GPU layout.
//!
//! A node's transform is kept as position, XYZ Euler rotation and scale so
//! the animation code can set a single axis (yaw of the creature root, pitch
//! of an arm) without touching the others. World matrices are derived from it.

use cgmath::{Matrix, Matrix3, Matrix4, Quaternion, Rad, Rotation3, SquareMatrix, Vector3};

use crate::data_structures::model;

/// Position, rotation (Euler angles in radians, applied X then Y then Z) and scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Instance {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Instance {
    /// Identity transformation (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Self::new()
        }
    }

    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vector3::new(x, y, z);
        self
    }

    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vector3::new(x, y, z);
        self
    }

    pub fn with_uniform_scale(self, s: f32) -> Self {
        self.with_scale(s, s, s)
    }

    /// Quaternion of the Euler rotation, composed as `Rx * Ry * Rz`.
    pub fn quaternion(&self) -> Quaternion<f32> {
        Quaternion::from_angle_x(Rad(self.rotation.x))
            * Quaternion::from_angle_y(Rad(self.rotation.y))
            * Quaternion::from_angle_z(Rad(self.rotation.z))
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.quaternion())
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn is_finite(&self) -> bool {
        [self.position, self.rotation, self.scale]
            .iter()
            .all(|v| v.x.is_finite() && v.y.is_finite() && v.z.is_finite())
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vector3<f32>> for Instance {
    fn from(position: Vector3<f32>) -> Self {
        Instance {
            position,
            ..Default::default()
        }
    }
}

/**
 * The raw instance is the actual data stored on the GPU: the node's world matrix,
 * the matrix used to bring normals into world space, and whether the node samples
 * the shadow map.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    model: [[f32; 4]; 4],
    normal: [[f32; 3]; 3],
    receive_shadow: f32,
}

impl InstanceRaw {
    pub fn new(world: &Matrix4<f32>, receive_shadow: bool) -> Self {
        let linear = Matrix3::new(
            world.x.x, world.x.y, world.x.z, world.y.x, world.y.y, world.y.z, world.z.x,
            world.z.y, world.z.z,
        );
        // Non-uniform scale (the chest) needs the inverse transpose for correct normals.
        let normal = linear
            .invert()
            .map(|inv| inv.transpose())
            .unwrap_or(linear);
        Self {
            model: (*world).into(),
            normal: normal.into(),
            receive_shadow: if receive_shadow { 1.0 } else { 0.0 },
        }
    }
}

/**
 * Stride layout: a 4x4 world matrix (four vec4 slots), a 3x3 normal matrix
 * (three vec3 slots) and one float flag.
 */
impl model::Vertex for InstanceRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            // Shaders only advance to the next entry when a new instance starts
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 19]>() as wgpu::BufferAddress,
                    shader_location: 10,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 22]>() as wgpu::BufferAddress,
                    shader_location: 11,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 25]>() as wgpu::BufferAddress,
                    shader_location: 12,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }
}
