//! OBJ file loader for 3D models

use crate::render::{Mesh, Vertex};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use thiserror::Error;

/// OBJ loading errors
#[derive(Error, Debug)]
pub enum ObjError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Parse error
    #[error("Parse error on line {line}: {message}")]
    ParseError {
        /// 1-based line number
        line: usize,
        /// What failed to parse
        message: String,
    },
    /// Structurally invalid file
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Wavefront OBJ reader
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file and return a mesh named `name`
    pub fn load_obj<P: AsRef<Path>>(name: &str, path: P) -> Result<Mesh, ObjError> {
        let file = File::open(path)?;
        Self::read_obj(name, BufReader::new(file))
    }

    /// Parse OBJ text from any reader
    pub fn read_obj<R: Read>(name: &str, reader: BufReader<R>) -> Result<Mesh, ObjError> {
        let mut vertices: Vec<Vertex> = Vec::new();
        let mut indices = Vec::new();

        for (line_idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            let line_no = line_idx + 1;

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();

            match parts[0] {
                "v" => vertices.push(Vertex::new(parse_triple(&parts, line_no, "vertex")?)),
                "f" => {
                    if parts.len() < 4 {
                        return Err(ObjError::ParseError {
                            line: line_no,
                            message: format!("face needs at least 3 vertices, found {}", parts.len() - 1),
                        });
                    }

                    let mut face_indices = Vec::with_capacity(parts.len() - 1);

                    for vertex_data in &parts[1..] {
                        // Only the position index matters; texture and normal
                        // references after the first '/' are ignored
                        let pos_idx = vertex_data
                            .split('/')
                            .next()
                            .and_then(|s| resolve_index(s, vertices.len()))
                            .ok_or_else(|| ObjError::ParseError {
                                line: line_no,
                                message: format!("invalid position index in '{vertex_data}'"),
                            })?;

                        face_indices.push(u32::try_from(pos_idx).map_err(|_| {
                            ObjError::InvalidFormat("too many vertices".to_string())
                        })?);
                    }

                    // Triangulate face (simple fan triangulation)
                    for i in 1..(face_indices.len() - 1) {
                        indices.push(face_indices[0]);
                        indices.push(face_indices[i]);
                        indices.push(face_indices[i + 1]);
                    }
                }
                _ => {
                    // Ignore other commands (normals, groups, materials, texture coordinates)
                }
            }
        }

        if indices.is_empty() {
            return Err(ObjError::InvalidFormat("No faces found in OBJ file".to_string()));
        }

        Ok(Mesh::new(name, vertices, indices))
    }
}

fn parse_triple(parts: &[&str], line: usize, what: &str) -> Result<[f32; 3], ObjError> {
    if parts.len() < 4 {
        return Err(ObjError::ParseError {
            line,
            message: format!("{what} needs 3 components"),
        });
    }
    let mut out = [0.0f32; 3];
    for (slot, raw) in out.iter_mut().zip(&parts[1..4]) {
        *slot = raw.parse().map_err(|_| ObjError::ParseError {
            line,
            message: format!("invalid {what} component '{raw}'"),
        })?;
    }
    Ok(out)
}

/// Resolve a 1-based (or negative, relative) OBJ index into a 0-based one
fn resolve_index(raw: &str, len: usize) -> Option<usize> {
    let idx: i64 = raw.parse().ok()?;
    let resolved = match idx {
        0 => return None,
        i if i > 0 => usize::try_from(i - 1).ok()?,
        i => len.checked_sub(usize::try_from(-i).ok()?)?,
    };
    (resolved < len).then_some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Mesh, ObjError> {
        ObjLoader::read_obj("test", BufReader::new(text.as_bytes()))
    }

    #[test]
    fn test_quad_is_fan_triangulated() {
        let mesh = parse(
            "# quad\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1 4//1\n",
        )
        .unwrap();

        assert_eq!(mesh.name, "test");
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.vertices[2].position, [1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_negative_indices_are_relative() {
        let mesh = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2]);

        let mesh = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\nv 5 5 5\nf -1 -2 -3\n").unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 2, 1]);
    }

    #[test]
    fn test_texture_and_normal_references_are_ignored() {
        let mesh = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/1 2/2/9 3//4\n").unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_out_of_bounds_index_is_error() {
        let err = parse("v 0 0 0\nv 1 0 0\nf 1 2 3\n").unwrap_err();
        assert!(matches!(err, ObjError::ParseError { line: 3, .. }));
    }

    #[test]
    fn test_bad_number_reports_line() {
        let err = parse("v 0 0 0\nv 1 x 0\n").unwrap_err();
        assert!(matches!(err, ObjError::ParseError { line: 2, .. }));
    }

    #[test]
    fn test_file_without_faces_is_invalid() {
        assert!(matches!(parse("v 0 0 0\n"), Err(ObjError::InvalidFormat(_))));
        assert!(matches!(parse(""), Err(ObjError::InvalidFormat(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ObjLoader::load_obj("nope", "/definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, ObjError::Io(_)));
    }
}
