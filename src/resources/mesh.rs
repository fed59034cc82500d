//! Procedural primitive meshes.
//!
//! Every builder returns a [`Geometry`] with positions, texture coordinates
//! and normals filled in and with counter-clockwise front faces, matching the
//! back-face culling of the basic pipeline.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use cgmath::{InnerSpace, Vector3};

use crate::data_structures::model::{Geometry, ModelVertex};

/// A flat grid in the XZ plane, centred on the origin with normals along +Y.
pub fn plane_grid(width: f32, depth: f32, segments: u32) -> Geometry {
    let n = segments.max(1);
    let row = n + 1;
    let mut vertices = Vec::with_capacity((row * row) as usize);
    for iz in 0..=n {
        let v = iz as f32 / n as f32;
        for ix in 0..=n {
            let u = ix as f32 / n as f32;
            vertices.push(ModelVertex {
                position: [(u - 0.5) * width, 0.0, (v - 0.5) * depth],
                tex_coords: [u, v],
                normal: [0.0, 1.0, 0.0],
            });
        }
    }
    let mut indices = Vec::with_capacity((n * n * 6) as usize);
    for iz in 0..n {
        for ix in 0..n {
            let a = iz * row + ix;
            let b = a + 1;
            let c = a + row;
            let d = c + 1;
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }
    Geometry::new("plane", vertices, indices)
}

/// A flat rectangle in the XY plane facing +Z, used for banners.
pub fn quad(width: f32, height: f32) -> Geometry {
    let (w, h) = (width / 2.0, height / 2.0);
    let vertices = vec![
        vertex([-w, -h, 0.0], [0.0, 1.0], [0.0, 0.0, 1.0]),
        vertex([w, -h, 0.0], [1.0, 1.0], [0.0, 0.0, 1.0]),
        vertex([w, h, 0.0], [1.0, 0.0], [0.0, 0.0, 1.0]),
        vertex([-w, h, 0.0], [0.0, 0.0], [0.0, 0.0, 1.0]),
    ];
    Geometry::new("quad", vertices, vec![0, 1, 2, 0, 2, 3])
}

pub fn cuboid(width: f32, height: f32, depth: f32) -> Geometry {
    let (x, y, z) = (width / 2.0, height / 2.0, depth / 2.0);
    // (normal, tangent u, tangent v) per face
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    let half = Vector3::new(x, y, z);
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let (n, u, v): (Vector3<f32>, Vector3<f32>, Vector3<f32>) = (normal.into(), u.into(), v.into());
        let base = vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let p = n + u * su + v * sv;
            vertices.push(vertex(
                [p.x * half.x, p.y * half.y, p.z * half.z],
                [(su + 1.0) / 2.0, (1.0 - sv) / 2.0],
                normal,
            ));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    finish("box", vertices, indices)
}

pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Geometry {
    let w = width_segments.max(3);
    let h = height_segments.max(2);
    let mut vertices = Vec::with_capacity(((w + 1) * (h + 1)) as usize);
    for iy in 0..=h {
        let v = iy as f32 / h as f32;
        let theta = v * PI;
        for ix in 0..=w {
            let u = ix as f32 / w as f32;
            let phi = u * TAU;
            let n = [-phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin()];
            vertices.push(vertex(
                [n[0] * radius, n[1] * radius, n[2] * radius],
                [u, v],
                n,
            ));
        }
    }
    let mut indices = Vec::new();
    for iy in 0..h {
        for ix in 0..w {
            let a = iy * (w + 1) + ix + 1;
            let b = iy * (w + 1) + ix;
            let c = (iy + 1) * (w + 1) + ix;
            let d = (iy + 1) * (w + 1) + ix + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != h - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    finish("sphere", vertices, indices)
}

/// A (possibly tapered) cylinder along Y, centred on the origin, with caps.
pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Geometry {
    let radial = radial_segments.max(3);
    let half = height / 2.0;
    let slope = (radius_bottom - radius_top) / height;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for (row, (y, r)) in [(half, radius_top), (-half, radius_bottom)].into_iter().enumerate() {
        for ix in 0..=radial {
            let u = ix as f32 / radial as f32;
            let theta = u * TAU;
            let (sin, cos) = theta.sin_cos();
            let n = Vector3::new(sin, slope, cos).normalize();
            vertices.push(vertex([r * sin, y, r * cos], [u, row as f32], n.into()));
        }
    }
    for ix in 0..radial {
        let a = ix;
        let b = ix + radial + 1;
        let c = ix + radial + 2;
        let d = ix + 1;
        indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    for (y, r, ny) in [(half, radius_top, 1.0), (-half, radius_bottom, -1.0)] {
        if r <= 0.0 {
            continue;
        }
        let center = vertices.len() as u32;
        vertices.push(vertex([0.0, y, 0.0], [0.5, 0.5], [0.0, ny, 0.0]));
        for ix in 0..=radial {
            let theta = ix as f32 / radial as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            vertices.push(vertex(
                [r * sin, y, r * cos],
                [cos * 0.5 + 0.5, sin * 0.5 * ny + 0.5],
                [0.0, ny, 0.0],
            ));
        }
        for ix in 0..radial {
            indices.extend_from_slice(&[center, center + 1 + ix, center + 2 + ix]);
        }
    }
    finish("cylinder", vertices, indices)
}

/// A cone along Y with its apex at `+height / 2`.
pub fn cone(radius: f32, height: f32, radial_segments: u32) -> Geometry {
    let mut geometry = cylinder(0.0, radius, height, radial_segments);
    geometry.name = "cone".into();
    geometry
}

/// A cylinder of `length` capped by two hemispheres; total height is `length + 2 * radius`.
pub fn capsule(radius: f32, length: f32, cap_segments: u32, radial_segments: u32) -> Geometry {
    let caps = cap_segments.max(1);
    let radial = radial_segments.max(3);
    let half = length / 2.0;

    // Profile rings from the top pole to the bottom pole: (ring radius, y, normal radial, normal y)
    let mut rings = Vec::with_capacity(2 * (caps as usize + 1));
    for i in 0..=caps {
        let a = i as f32 / caps as f32 * FRAC_PI_2;
        rings.push((radius * a.sin(), half + radius * a.cos(), a.sin(), a.cos()));
    }
    for i in 0..=caps {
        let a = FRAC_PI_2 + i as f32 / caps as f32 * FRAC_PI_2;
        rings.push((radius * a.sin(), -half + radius * a.cos(), a.sin(), a.cos()));
    }

    let total = length + 2.0 * radius;
    let mut vertices = Vec::with_capacity(rings.len() * (radial as usize + 1));
    for &(r, y, nr, ny) in &rings {
        for ix in 0..=radial {
            let u = ix as f32 / radial as f32;
            let (sin, cos) = (u * TAU).sin_cos();
            vertices.push(vertex(
                [r * sin, y, r * cos],
                [u, 0.5 - y / total],
                [nr * sin, ny, nr * cos],
            ));
        }
    }
    let mut indices = Vec::new();
    let row = radial + 1;
    for ring in 0..(rings.len() as u32 - 1) {
        for ix in 0..radial {
            let a = ring * row + ix;
            let b = a + row;
            let c = b + 1;
            let d = a + 1;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    finish("capsule", vertices, indices)
}

/// A flat-shaded regular dodecahedron.
pub fn dodecahedron(radius: f32) -> Geometry {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let r = 1.0 / t;
    #[rustfmt::skip]
    let corners: [[f32; 3]; 20] = [
        [-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0],
        [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0],
        [0.0, -r, -t], [0.0, -r, t], [0.0, r, -t], [0.0, r, t],
        [-r, -t, 0.0], [-r, t, 0.0], [r, -t, 0.0], [r, t, 0.0],
        [-t, 0.0, -r], [t, 0.0, -r], [-t, 0.0, r], [t, 0.0, r],
    ];
    #[rustfmt::skip]
    let faces: [u32; 108] = [
        3, 11, 7, 3, 7, 15, 3, 15, 13,
        7, 19, 17, 7, 17, 6, 7, 6, 15,
        17, 4, 8, 17, 8, 10, 17, 10, 6,
        8, 0, 16, 8, 16, 2, 8, 2, 10,
        0, 12, 1, 0, 1, 18, 0, 18, 16,
        6, 10, 2, 6, 2, 13, 6, 13, 15,
        2, 16, 18, 2, 18, 3, 2, 3, 13,
        18, 1, 9, 18, 9, 11, 18, 11, 3,
        4, 14, 12, 4, 12, 0, 4, 0, 8,
        11, 9, 5, 11, 5, 19, 11, 19, 7,
        19, 5, 14, 19, 14, 4, 19, 4, 17,
        1, 12, 14, 1, 14, 5, 1, 5, 9,
    ];
    let points: Vec<Vector3<f32>> = corners
        .iter()
        .map(|c| Vector3::from(*c).normalize() * radius)
        .collect();
    let mut vertices = Vec::with_capacity(faces.len());
    let mut indices = Vec::with_capacity(faces.len());
    for tri in faces.chunks(3) {
        let (p0, p1, p2) = (points[tri[0] as usize], points[tri[1] as usize], points[tri[2] as usize]);
        let mut n = (p1 - p0).cross(p2 - p0).normalize();
        let centroid = (p0 + p1 + p2) / 3.0;
        let ordered = if n.dot(centroid) < 0.0 {
            n = -n;
            [p0, p2, p1]
        } else {
            [p0, p1, p2]
        };
        for p in ordered {
            indices.push(vertices.len() as u32);
            vertices.push(vertex(p.into(), [0.5 + p.x / (2.0 * radius), 0.5 - p.y / (2.0 * radius)], n.into()));
        }
    }
    Geometry::new("dodecahedron", vertices, indices)
}

/**
 * Recomputes smooth vertex normals by accumulating the (area weighted) face
 * normal of every triangle a vertex belongs to and normalizing the sum.
 */
pub fn compute_vertex_normals(geometry: &mut Geometry) {
    let mut sums = vec![Vector3::new(0.0_f32, 0.0, 0.0); geometry.vertices.len()];
    for c in geometry.indices.chunks(3) {
        let pos0: Vector3<f32> = geometry.vertices[c[0] as usize].position.into();
        let pos1: Vector3<f32> = geometry.vertices[c[1] as usize].position.into();
        let pos2: Vector3<f32> = geometry.vertices[c[2] as usize].position.into();
        let face = (pos1 - pos0).cross(pos2 - pos0);
        for &i in c {
            sums[i as usize] += face;
        }
    }
    for (v, n) in geometry.vertices.iter_mut().zip(sums) {
        v.normal = if n.magnitude2() > 0.0 {
            n.normalize().into()
        } else {
            [0.0, 1.0, 0.0]
        };
    }
}

fn vertex(position: [f32; 3], tex_coords: [f32; 2], normal: [f32; 3]) -> ModelVertex {
    ModelVertex {
        position,
        tex_coords,
        normal,
    }
}

/// Flips any triangle whose winding disagrees with its vertex normals.
fn finish(name: &str, vertices: Vec<ModelVertex>, mut indices: Vec<u32>) -> Geometry {
    for c in indices.chunks_mut(3) {
        let [v0, v1, v2] = [c[0], c[1], c[2]].map(|i| vertices[i as usize]);
        let p0: Vector3<f32> = v0.position.into();
        let face = (Vector3::from(v1.position) - p0).cross(Vector3::from(v2.position) - p0);
        let normal = Vector3::from(v0.normal) + Vector3::from(v1.normal) + Vector3::from(v2.normal);
        if face.dot(normal) < 0.0 {
            c.swap(1, 2);
        }
    }
    Geometry::new(name, vertices, indices)
}
