use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fiberformats::{GiftiSurface, LabelPalette, TckFile};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use std::io::Write;

fn deflate_base64(bytes: &[u8]) -> String {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    STANDARD.encode(encoder.finish().unwrap())
}

/// A triangle strip winding around a helix, sized like a small brain
/// surface.
fn surface_xml(num_vertices: usize) -> String {
    let mut points: Vec<f32> = Vec::with_capacity(num_vertices * 3);
    for i in 0..num_vertices {
        let x = i as f32 * 0.5;
        points.extend_from_slice(&[x, x.sin(), x.cos()]);
    }
    let num_triangles = num_vertices.saturating_sub(2) as u32;
    let mut triangles: Vec<u32> = Vec::with_capacity(num_triangles as usize * 3);
    for i in 0..num_triangles {
        triangles.extend_from_slice(&[i, i + 1, i + 2]);
    }

    let point_payload = deflate_base64(
        &points.iter().flat_map(|v| v.to_le_bytes()).collect::<Vec<u8>>(),
    );
    let triangle_payload = deflate_base64(
        &triangles.iter().flat_map(|v| v.to_le_bytes()).collect::<Vec<u8>>(),
    );
    format!(
        r#"<GIFTI Version="1.0" NumberOfDataArrays="2">
    <DataArray Intent="NIFTI_INTENT_POINTSET"><Data>{point_payload}</Data></DataArray>
    <DataArray Intent="NIFTI_INTENT_TRIANGLE"><Data>{triangle_payload}</Data></DataArray>
</GIFTI>"#
    )
}

fn tck_buffer(num_tracks: usize, points_per_track: usize) -> Vec<u8> {
    let mut values: Vec<f32> = Vec::new();
    for t in 0..num_tracks {
        for p in 0..points_per_track {
            let s = (t * points_per_track + p) as f32;
            values.extend_from_slice(&[s, s * 0.5, s * 0.25]);
        }
        values.extend_from_slice(&[f32::NAN; 3]);
    }
    values.extend_from_slice(&[f32::INFINITY; 3]);
    let payload: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();

    let render = |offset: usize| {
        format!(
            "mrtrix tracks\ndatatype: Float32LE\ncount: {num_tracks}\nfile: . {offset:<8}\nEND\n"
        )
    };
    let offset = render(0).len();
    let mut bytes = render(offset).into_bytes();
    bytes.extend_from_slice(&payload);
    bytes
}

fn gifti_surface(xml: &str) -> GiftiSurface {
    GiftiSurface::from_xml(xml, None).unwrap()
}

fn tck_file(bytes: &[u8]) -> TckFile {
    TckFile::from_bytes(bytes, None).unwrap()
}

fn label_palette(labels: &[i32]) -> LabelPalette {
    LabelPalette::build(labels)
}

fn bench_decode(c: &mut Criterion) {
    let xml = surface_xml(10_000);
    c.bench_function("gifti_surface", |b| {
        b.iter(|| gifti_surface(black_box(&xml)))
    });

    let bytes = tck_buffer(500, 100);
    c.bench_function("tck_file", |b| b.iter(|| tck_file(black_box(&bytes))));

    let labels: Vec<i32> = (0..10_000).map(|i| i % 36).collect();
    c.bench_function("label_palette", |b| {
        b.iter(|| label_palette(black_box(&labels)))
    });
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
