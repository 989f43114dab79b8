//! Walkthrough of the dedup + refcount flow against the headless driver.
//!
//! Run with `cargo run -p cobalt_cache --example layout_dedup`.

use cobalt_cache::{BindGroupLayoutCache, VertexLayoutCache};
use cobalt_gpu::{
    BindGroupLayoutDesc, BindingFlags, BindingKind, HeadlessDriver, LayoutBinding, ShaderStages,
    VertexAttribute, VertexFormat, VertexLayoutDesc,
};

fn material_layout() -> BindGroupLayoutDesc {
    BindGroupLayoutDesc::new(vec![
        LayoutBinding::new(0, BindingKind::UniformBuffer, ShaderStages::VERTEX)
            .with_flags(BindingFlags::DYNAMIC_OFFSET),
        LayoutBinding::new(1, BindingKind::SampledTexture, ShaderStages::FRAGMENT),
        LayoutBinding::new(2, BindingKind::Sampler, ShaderStages::FRAGMENT),
    ])
}

fn mesh_vertex_layout() -> VertexLayoutDesc {
    VertexLayoutDesc::new(1)
        .with_attribute(VertexAttribute::new(VertexFormat::Float32x3, 0, 0, 32))
        .with_attribute(VertexAttribute::new(VertexFormat::Float32x3, 0, 12, 32))
        .with_attribute(VertexAttribute::new(VertexFormat::Float32x2, 0, 24, 32))
}

fn main() -> anyhow::Result<()> {
    let mut driver = HeadlessDriver::new();
    let mut layouts = BindGroupLayoutCache::new();
    let mut vertex_layouts = VertexLayoutCache::new();

    // a hundred "materials" all asking for the same two objects
    let mut handles = Vec::new();
    for _ in 0..100 {
        let layout = layouts.create(&mut driver, material_layout())?;
        let vertices = vertex_layouts.create(&mut driver, mesh_vertex_layout())?;
        handles.push((layout, vertices));
    }

    println!(
        "100 materials -> {} bind group layout(s), {} vertex layout(s) created",
        driver.bind_group_layout_counts().created,
        driver.vertex_layout_counts().created,
    );
    println!(
        "layout cache: {} hit(s), {} miss(es)",
        layouts.stats().hits,
        layouts.stats().misses,
    );

    // tear everything down; the driver objects die on the last release
    for (layout, vertices) in handles {
        layouts.destroy(&mut driver, layout);
        vertex_layouts.destroy(&mut driver, vertices);
    }
    layouts.terminate(&mut driver);
    vertex_layouts.terminate(&mut driver);

    println!("live driver objects after teardown: {}", driver.live_objects());
    Ok(())
}
