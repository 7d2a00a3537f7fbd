use criterion::{criterion_group, criterion_main, Criterion};
use meshlink_core::parser::{parse_mesh_link, ParserOptions};
use meshlink_core::writer::{write_mesh_link, WriterOptions};
use std::io::Cursor;

/// Builds a synthetic MeshLink document with `n` triangular faces on one
/// sheet. Neither `sphere_ml.xml` nor an ONERA M6 dataset ship with this
/// crate (see DESIGN.md), so benchmarking uses a generated document scaled
/// to a size comparable to a small surface mesh rather than a bundled fixture.
fn synthetic_document(n: usize) -> String {
    let mut faces = String::new();
    for i in 0..n {
        let (i1, i2, i3) = (i as i64, i as i64 + 1, i as i64 + 2);
        faces.push_str(&format!(
            "<MeshFace etype=\"Tri3\" mid=\"{}\" name=\"f{i}\">{i1} {i2} {i3}</MeshFace>\n",
            i + 1
        ));
    }
    format!(
        "<?xml version=\"1.0\"?>\n<MeshLink version=\"1.0\">\n  \
         <GeometryFile filename=\"geom.xyz\"><GeometryReference gid=\"1\" ref=\"face_1\"/></GeometryFile>\n  \
         <MeshFile filename=\"mesh.xyz\"><MeshModelReference ref=\"/Base/m0\" name=\"/Base/m0\">\n  \
         <MeshSheet name=\"sh0\" gref=\"1\">\n{faces}</MeshSheet>\n  \
         </MeshModelReference></MeshFile>\n</MeshLink>"
    )
}

fn bench_parse(c: &mut Criterion) {
    let small = synthetic_document(64);
    let large = synthetic_document(4096);

    c.bench_function("parse_sheet_64_faces", |b| {
        b.iter(|| {
            let (facade, _report) = parse_mesh_link(Cursor::new(&small), &ParserOptions::default()).unwrap();
            std::hint::black_box(facade);
        })
    });

    c.bench_function("parse_sheet_4096_faces", |b| {
        b.iter(|| {
            let (facade, _report) = parse_mesh_link(Cursor::new(&large), &ParserOptions::default()).unwrap();
            std::hint::black_box(facade);
        })
    });
}

fn bench_write(c: &mut Criterion) {
    let (facade, _report) =
        parse_mesh_link(Cursor::new(synthetic_document(4096)), &ParserOptions::default()).unwrap();
    let options = WriterOptions::from_doc_meta(&facade.xml_meta);

    c.bench_function("write_sheet_4096_faces", |b| {
        b.iter(|| {
            let mut buf = Vec::new();
            write_mesh_link(&facade, &mut buf, &options).unwrap();
            std::hint::black_box(buf);
        })
    });
}

criterion_group!(benches, bench_parse, bench_write);
criterion_main!(benches);
