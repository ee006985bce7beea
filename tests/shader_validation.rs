//! Parses and validates every WGSL module with naga, so a broken shader
//! fails in CI instead of at pipeline creation.

use nocturne::gpu::shaders::{all_shaders, PRELUDE};

fn validate(name: &str, src: &str) -> naga::Module {
    let module = match naga::front::wgsl::parse_str(src) {
        Ok(module) => module,
        Err(e) => panic!("{} failed to parse:\n{}", name, e.emit_to_string(src)),
    };

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    if let Err(e) = validator.validate(&module) {
        panic!("{} failed validation:\n{}", name, e.emit_to_string(src));
    }
    module
}

#[test]
fn test_all_shaders_validate() {
    for (name, src) in all_shaders() {
        validate(name, &src);
    }
}

#[test]
fn test_prelude_alone_validates() {
    validate("prelude", PRELUDE);
}

#[test]
fn test_entry_points() {
    for (name, src) in all_shaders() {
        let module = validate(name, &src);
        let stages: Vec<_> = module
            .entry_points
            .iter()
            .map(|ep| (ep.name.as_str(), ep.stage))
            .collect();
        assert!(
            stages.contains(&("vs_main", naga::ShaderStage::Vertex)),
            "{} lacks a vertex entry point",
            name
        );
        assert!(
            stages.contains(&("fs_main", naga::ShaderStage::Fragment)),
            "{} lacks a fragment entry point",
            name
        );
    }
}

#[test]
fn test_uniform_block_size_matches_host() {
    let module = validate("mesh", &nocturne::gpu::shaders::mesh_shader());
    let (_, ty) = module
        .types
        .iter()
        .find(|(_, ty)| ty.name.as_deref() == Some("SceneUniforms"))
        .expect("SceneUniforms is declared");
    match ty.inner {
        naga::TypeInner::Struct { span, .. } => {
            assert_eq!(
                span as usize,
                std::mem::size_of::<nocturne::gpu::SceneUniforms>()
            );
        }
        _ => panic!("SceneUniforms is not a struct"),
    }
}
