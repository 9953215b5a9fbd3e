/// Geometry primitives handed to the renderer
use std::sync::Arc;

use crate::math::{Matrix4, Vector2, Vector3};
use crate::texture::Texture;
use crate::transform::{RotationState, Transform};

/// A 3D vertex with position and optional UV / normal attributes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vector3,
    pub uv: Option<Vector2>,
    pub normal: Option<Vector3>,
}

impl Vertex {
    pub fn new(position: Vector3) -> Self {
        Self {
            position,
            uv: None,
            normal: None,
        }
    }

    pub fn with_uv(mut self, u: f32, v: f32) -> Self {
        self.uv = Some(Vector2::new(u, v));
        self
    }

    pub fn with_normal(mut self, normal: Vector3) -> Self {
        self.normal = Some(normal);
        self
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Adds a quad as two triangles. Corners go counter-clockwise starting at
    /// the one that receives UV (0, 0).
    fn add_quad(&mut self, corners: [Vector3; 4], normal: Vector3) {
        let uvs = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let v: Vec<Vertex> = corners
            .iter()
            .zip(uvs)
            .map(|(p, (u, v))| Vertex::new(*p).with_uv(u, v).with_normal(normal))
            .collect();
        self.add_triangle(Triangle::new(v[0], v[1], v[2]));
        self.add_triangle(Triangle::new(v[0], v[2], v[3]));
    }

    /// Create a textured cube centered at the origin
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let p = Vector3::new;
        let mut mesh = Self::with_capacity(12);

        // Front face
        mesh.add_quad(
            [p(-h, -h, h), p(h, -h, h), p(h, h, h), p(-h, h, h)],
            p(0.0, 0.0, 1.0),
        );
        // Back face
        mesh.add_quad(
            [p(h, -h, -h), p(-h, -h, -h), p(-h, h, -h), p(h, h, -h)],
            p(0.0, 0.0, -1.0),
        );
        // Top face
        mesh.add_quad(
            [p(-h, h, h), p(h, h, h), p(h, h, -h), p(-h, h, -h)],
            p(0.0, 1.0, 0.0),
        );
        // Bottom face
        mesh.add_quad(
            [p(-h, -h, -h), p(h, -h, -h), p(h, -h, h), p(-h, -h, h)],
            p(0.0, -1.0, 0.0),
        );
        // Right face
        mesh.add_quad(
            [p(h, -h, h), p(h, -h, -h), p(h, h, -h), p(h, h, h)],
            p(1.0, 0.0, 0.0),
        );
        // Left face
        mesh.add_quad(
            [p(-h, -h, -h), p(-h, -h, h), p(-h, h, h), p(-h, h, -h)],
            p(-1.0, 0.0, 0.0),
        );

        mesh
    }
}

/// A mesh placed in the world, with an optional shared texture
#[derive(Debug, Clone)]
pub struct Model {
    pub mesh: Mesh,
    pub position: Vector3,
    pub rotation: RotationState,
    pub scale: Vector3,
    pub visible: bool,
    pub texture: Option<Arc<Texture>>,
}

impl Model {
    pub fn new(mesh: Mesh) -> Self {
        Self {
            mesh,
            position: Vector3::ZERO,
            rotation: RotationState::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            visible: true,
            texture: None,
        }
    }

    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn model_matrix(&self) -> Matrix4 {
        Transform::model_matrix(self.position, &self.rotation, self.scale)
    }
}
