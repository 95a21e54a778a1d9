//! Gmsh MSH 2.2 (ASCII) writer.
//!
//! Boundaries with a nonzero marker are written first, using the marker as
//! physical and geometrical tag, followed by every cell tagged with its
//! marker. Node numbers are creation indices plus one.
//!
//! ## Element types
//! - 15 = point, 1 = line
//! - 2 = triangle, 3 = quadrangle
//! - 4 = tetrahedron, 5 = hexahedron, 6 = prism

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::PersistError;
use crate::mesh::{CellShape, Mesh, NodeId};

/// Writes `mesh` to `path` in Gmsh MSH 2.2 format.
///
/// # Errors
///
/// Returns [`PersistError::Io`] if the file cannot be written and
/// [`PersistError::UnsupportedElement`] for a boundary with no Gmsh element
/// type.
pub fn write_gmsh(mesh: &Mesh, path: &Path) -> Result<(), PersistError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_mesh(mesh, &mut writer)?;
    writer.flush()?;
    debug!(path = %path.display(), nodes = mesh.node_count(), "wrote gmsh mesh");
    Ok(())
}

fn write_mesh<W: Write>(mesh: &Mesh, writer: &mut W) -> Result<(), PersistError> {
    writeln!(writer, "$MeshFormat")?;
    writeln!(writer, "2.2 0 8")?;
    writeln!(writer, "$EndMeshFormat")?;

    writeln!(writer, "$Nodes")?;
    writeln!(writer, "{}", mesh.node_count())?;
    for (_, node) in mesh.nodes() {
        writeln!(
            writer,
            "{} {} {} {}",
            node.index + 1,
            node.pos.x,
            node.pos.y,
            node.pos.z
        )?;
    }
    writeln!(writer, "$EndNodes")?;

    let mut elements = Vec::new();
    for (_, boundary) in mesh.boundaries().filter(|(_, b)| b.marker != 0) {
        let kind = boundary_type(mesh.dim(), boundary.nodes.len())?;
        elements.push((kind, boundary.marker, boundary.nodes.as_slice()));
    }
    for (_, cell) in mesh.cells() {
        elements.push((cell_type(cell.shape), cell.marker, cell.nodes.as_slice()));
    }

    writeln!(writer, "$Elements")?;
    writeln!(writer, "{}", elements.len())?;
    for (i, (kind, marker, nodes)) in elements.iter().enumerate() {
        // elem_id type n_tags physical geometrical node...
        write!(writer, "{} {kind} 2 {marker} {marker}", i + 1)?;
        for &id in *nodes {
            write!(writer, " {}", node_number(mesh, id)?)?;
        }
        writeln!(writer)?;
    }
    writeln!(writer, "$EndElements")?;
    Ok(())
}

fn boundary_type(dim: u8, nodes: usize) -> Result<u8, PersistError> {
    match (dim, nodes) {
        (1, 1) => Ok(15),
        (2, 2) => Ok(1),
        (3, 3) => Ok(2),
        (3, 4) => Ok(3),
        _ => Err(PersistError::UnsupportedElement { dim, nodes }),
    }
}

fn cell_type(shape: CellShape) -> u8 {
    match shape {
        CellShape::Edge => 1,
        CellShape::Triangle => 2,
        CellShape::Quadrangle => 3,
        CellShape::Tetrahedron => 4,
        CellShape::Hexahedron => 5,
        CellShape::TriPrism => 6,
    }
}

fn node_number(mesh: &Mesh, id: NodeId) -> Result<usize, PersistError> {
    Ok(mesh.node(id)?.index + 1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::operations::grid::{MakeGrid, MarkerType};

    fn section<'a>(text: &'a str, name: &str) -> Vec<&'a str> {
        text.lines()
            .skip_while(|l| *l != format!("${name}"))
            .skip(1)
            .take_while(|l| *l != format!("$End{name}"))
            .collect()
    }

    #[test]
    fn writes_nodes_then_boundaries_then_cells() {
        let mesh = MakeGrid::uniform_2d(2, 1)
            .with_marker_type(MarkerType::BoundarySides)
            .execute()
            .unwrap();
        let file = NamedTempFile::new().unwrap();
        write_gmsh(&mesh, file.path()).unwrap();
        let text = fs::read_to_string(file.path()).unwrap();

        assert_eq!(section(&text, "MeshFormat"), vec!["2.2 0 8"]);

        let nodes = section(&text, "Nodes");
        assert_eq!(nodes[0], "6");
        assert_eq!(nodes[1], "1 0 0 0");
        assert_eq!(nodes[6], "6 2 1 0");

        // 6 outer edges + 2 quads; the shared edge has marker 0
        let elements = section(&text, "Elements");
        assert_eq!(elements[0], "8");
        assert!(elements[1..7].iter().all(|l| l.split(' ').nth(1) == Some("1")));
        assert_eq!(elements[7], "7 3 2 0 0 1 2 5 4");
        assert_eq!(elements[8], "8 3 2 0 0 2 3 6 5");
    }

    #[test]
    fn volume_cells_use_gmsh_types() {
        let mesh = MakeGrid::uniform_3d(1, 1, 1).execute().unwrap();
        let mut buf = Vec::new();
        write_mesh(&mesh, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let elements = section(&text, "Elements");
        assert_eq!(elements, vec!["1", "1 5 2 0 0 1 2 4 3 5 6 8 7"]);
    }

    #[test]
    fn missing_directory_is_io_error() {
        let mesh = MakeGrid::line(&[0.0, 1.0]).execute().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let err = write_gmsh(&mesh, &dir.path().join("missing").join("mesh.msh")).unwrap_err();
        assert!(matches!(err, PersistError::Io(_)));
    }
}
