use std::path::PathBuf;

use crack_generator::{
    build_bridging_domain_geometry, build_crack_geometry, classify_faces, BridgingDomainParams,
    BridgingDomainPipeline, BuildConfig, BuildContext, BuildError, BuildWarning, CrackBuilder,
    CrackParams, FileCheckpoints, NoCheckpoints, RegionBox, BRIDGING_DOMAIN_STEM, FINAL_REGIONS,
};
use grid_format::read_grid;
use grid_kernel::{BoundingBox, Point3d, SubsetIndex};
use grid_meshing::StructuredMesher;
use uuid::Uuid;

// ── Helper Functions ─────────────────────────────────────────────────────

fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("crack-generator-{}", Uuid::new_v4()))
}

/// Two cells of 0.2 along x, five along y, four extrusion steps of 0.1.
fn small_domain() -> BridgingDomainParams {
    BridgingDomainParams {
        height: 0.4,
        width: 0.4,
        depth: 0.4,
        thickness: 0.2,
        spacing: 0.2,
        lattice_finess: 2.0,
        lattice_constant: 0.1,
    }
}

fn max_y(ctx: &BuildContext, region: SubsetIndex) -> f64 {
    ctx.grid
        .vertices_in(region)
        .into_iter()
        .map(|v| ctx.grid.position(v).y)
        .fold(f64::NEG_INFINITY, f64::max)
}

// ── Crack Tip ────────────────────────────────────────────────────────────

#[test]
fn crack_squares_are_nested() {
    let params = CrackParams {
        crack_inner_length: 0.2,
        inner_thickness: 0.1,
        crack_outer_length: 2.0,
        angle_degrees: 10.0,
    };
    let mut builder = CrackBuilder::new(params, &BuildConfig::crack_tip()).unwrap();
    let report = builder.build(&mut NoCheckpoints).unwrap();
    assert_eq!(
        report.region_names,
        vec!["Inner square", "Middle square", "Outer square"]
    );

    let ctx = builder.context();
    let extents: Vec<f64> = (0..3).map(|i| max_y(ctx, SubsetIndex(i))).collect();
    assert!(extents[0] < extents[1] && extents[1] < extents[2], "{extents:?}");
    let cos = 10f64.to_radians().cos();
    assert!((extents[2] - 2.0 * cos).abs() < 1e-12);
}

#[test]
fn crack_entry_point_writes_every_step() {
    let dir = scratch_dir();
    let config = BuildConfig::crack_tip().with_checkpoint_dir(&dir);
    let report = build_crack_geometry(0.2, 0.1, 2.0, 10.0, &config).unwrap();
    assert_eq!(report.stages.len(), 4);

    for step in 1..=4 {
        assert!(dir.join(format!("crack_generator_step_{step}.json")).exists());
    }
    let last = read_grid(dir.join("crack_generator.json")).unwrap();
    assert_eq!(last.grid.counts(), (19, 21, 0, 0));
    assert_eq!(last.subsets.len(), 3);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn crack_entry_point_names_files_after_itself_by_default() {
    let dir = scratch_dir();
    let config = BuildConfig::default().with_checkpoint_dir(&dir);
    build_crack_geometry(0.2, 0.1, 2.0, 10.0, &config).unwrap();

    assert!(dir.join("crack_generator_step_1.json").exists());
    assert!(dir.join("crack_generator.json").exists());
    assert!(!dir.join("bridging_domain_step_1.json").exists());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn crack_with_wide_angle_writes_nothing() {
    let dir = scratch_dir();
    let config = BuildConfig::crack_tip().with_checkpoint_dir(&dir);
    let err = build_crack_geometry(0.2, 0.1, 2.0, 60.0, &config).unwrap_err();
    assert!(matches!(err, BuildError::InvalidGeometry { .. }), "{err}");
    assert!(!dir.exists());
}

// ── Parameter Validation ─────────────────────────────────────────────────

#[test]
fn crack_radii_out_of_order_write_nothing() {
    let dir = scratch_dir();
    let config = BuildConfig::crack_tip().with_checkpoint_dir(&dir);
    // Every closing height is positive at 10 degrees, so only the ordering
    // check stops this.
    match build_crack_geometry(0.2, 0.3, 2.0, 10.0, &config) {
        Err(BuildError::InvalidParameter { name, value, .. }) => {
            assert_eq!(name, "inner_thickness");
            assert_eq!(value, 0.3);
        }
        other => panic!("Expected InvalidParameter, got {:?}", other),
    }
    assert!(!dir.exists());
}

#[test]
fn thickness_equal_to_height_is_rejected() {
    let params = BridgingDomainParams {
        height: 1.0,
        width: 1.0,
        depth: 1.0,
        thickness: 1.0,
        spacing: 0.2,
        lattice_finess: 1.0,
        lattice_constant: 0.1,
    };
    let dir = scratch_dir();
    let config = BuildConfig::bridging_domain().with_checkpoint_dir(&dir);
    match build_bridging_domain_geometry(&params, &config) {
        Err(BuildError::InvalidParameter { name, value, .. }) => {
            assert_eq!(name, "thickness");
            assert_eq!(value, 1.0);
        }
        other => panic!("Expected InvalidParameter, got {:?}", other),
    }
    assert!(!dir.exists());

    let half = BridgingDomainParams {
        thickness: 0.5,
        ..params
    };
    assert!(BridgingDomainPipeline::new(half, BuildConfig::bridging_domain()).is_ok());
}

// ── Bridging Domain ──────────────────────────────────────────────────────

#[test]
fn bridging_domain_ends_with_seven_regions() {
    let dir = scratch_dir();
    let config = BuildConfig::bridging_domain().with_checkpoint_dir(&dir);
    let report = build_bridging_domain_geometry(&small_domain(), &config).unwrap();

    assert!(report.reliable);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(report.region_names, FINAL_REGIONS.to_vec());
    assert_eq!(report.extrusion_steps, 4);
    assert_eq!(report.volumes, 2 * 5 * 4 * 6);

    // Every stage but the last is checkpointed, then the final grid.
    let steps = report.stages.len() - 1;
    for step in 1..=steps {
        assert!(dir.join(format!("bridging_domain_step_{step}.json")).exists());
    }
    assert!(!dir.join(format!("bridging_domain_step_{}.json", steps + 1)).exists());

    let last = read_grid(dir.join("bridging_domain.json")).unwrap();
    assert_eq!(last.subsets.names(), FINAL_REGIONS.to_vec());
    assert_eq!(last.grid.counts().3, report.volumes);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn volumes_land_in_their_layer() {
    let mut pipeline =
        BridgingDomainPipeline::new(small_domain(), BuildConfig::bridging_domain()).unwrap();
    pipeline
        .run(&mut StructuredMesher::new(), &mut NoCheckpoints)
        .unwrap();
    let ctx = pipeline.context();

    // (region, y range) for height 0.4, thickness 0.2, spacing 0.2.
    let layers = [
        ("FE1", 0.0, 0.2),
        ("BD1", 0.2, 0.4),
        ("FE2", 0.8, 1.0),
        ("BD2", 0.6, 0.8),
        ("MD", 0.4, 0.6),
    ];
    for (name, y0, y1) in layers {
        let region = ctx.region(name).unwrap();
        let volumes = ctx.grid.volumes_in(region);
        // One cell across the layer, two along x, four along z.
        assert_eq!(volumes.len(), 2 * 4 * 6, "{name}");
        for v in volumes {
            let c = ctx.grid.volume_centroid(v);
            assert!(c.y > y0 && c.y < y1, "{name}: {c:?}");
        }
    }

    let top = ctx.region("Top").unwrap();
    let bottom = ctx.region("Bottom").unwrap();
    // 2 x 5 cells, two triangles each.
    assert_eq!(ctx.grid.faces_in(top).len(), 20);
    assert_eq!(ctx.grid.faces_in(bottom).len(), 20);
    for f in ctx.grid.faces_in(top) {
        assert!((ctx.grid.face_centroid(f).z - 0.4).abs() < 1e-9);
    }
    assert!(ctx.grid.references_are_valid());
}

#[test]
fn uneven_width_warns_but_completes() {
    // h·r₀ = 0.3 does not divide the width; everything else is a multiple.
    let params = BridgingDomainParams {
        height: 1.2,
        width: 1.0,
        depth: 0.6,
        thickness: 0.3,
        spacing: 0.3,
        lattice_finess: 3.0,
        lattice_constant: 0.1,
    };
    let mut pipeline = BridgingDomainPipeline::new(params, BuildConfig::bridging_domain()).unwrap();
    let report = pipeline
        .run(&mut StructuredMesher::new(), &mut NoCheckpoints)
        .unwrap();

    assert!(report.reliable);
    assert_eq!(report.region_names.len(), 7);
    assert_eq!(report.warnings.len(), 1);
    match &report.warnings[0] {
        BuildWarning::NonUniformSpacing {
            dimension, length, ..
        } => {
            assert_eq!(*dimension, "width");
            assert_eq!(*length, 1.0);
        }
    }

    // The short last column still spans the full width.
    let bb = pipeline.context().grid.bounding_box();
    assert_eq!(bb.max.x, 1.0);
    assert!((bb.max.y - 2.7).abs() < 1e-9);
    assert!((bb.max.z - 0.6).abs() < 1e-9);
}

#[test]
fn wrong_region_count_still_writes_final_grid() {
    let dir = scratch_dir();
    let config = BuildConfig {
        expected_region_count: 8,
        ..BuildConfig::bridging_domain().with_checkpoint_dir(&dir)
    };
    let mut checkpoints = FileCheckpoints::from_config(&config.checkpoints, BRIDGING_DOMAIN_STEM);
    let mut pipeline = BridgingDomainPipeline::new(small_domain(), config).unwrap();

    match pipeline.run(&mut StructuredMesher::new(), &mut checkpoints) {
        Err(BuildError::AssemblyInvariantViolation {
            expected,
            found,
            regions,
        }) => {
            assert_eq!((expected, found), (8, 7));
            assert_eq!(regions, FINAL_REGIONS.to_vec());
        }
        other => panic!("Expected AssemblyInvariantViolation, got {:?}", other),
    }
    assert!(checkpoints.final_path().exists());
    assert_eq!(checkpoints.written().last(), Some(&checkpoints.final_path()));
    assert!(!pipeline.report().reliable);
    std::fs::remove_dir_all(&dir).ok();
}

// ── Classification ───────────────────────────────────────────────────────

#[test]
fn overlapping_boxes_first_registered_wins() {
    let mut ctx = BuildContext::with_regions("overlap", &["Pool", "A", "B"]);
    let pool = SubsetIndex(0);
    let a = ctx.add_vertex(Point3d::planar(0.0, 0.0));
    let b = ctx.add_vertex(Point3d::planar(1.0, 0.0));
    let c = ctx.add_vertex(Point3d::planar(0.0, 1.0));
    for (p, q) in [(a, b), (b, c), (c, a)] {
        ctx.add_edge(p, q);
    }
    let face = ctx.grid.create_face([a, b, c], pool);

    // Both boxes contain the whole face.
    let wide = BoundingBox::new(Point3d::planar(-1.0, -1.0), Point3d::planar(2.0, 2.0));
    let box_a = RegionBox::named(&ctx, "A", wide).unwrap();
    let box_b = RegionBox::named(&ctx, "B", wide).unwrap();

    let mut first = ctx.clone();
    classify_faces(&mut first, &[face], &[box_a, box_b]).unwrap();
    assert_eq!(first.grid.faces[face].subset, box_a.region);
    assert_eq!(first.grid.vertices[a].subset, box_a.region);

    let mut second = ctx.clone();
    classify_faces(&mut second, &[face], &[box_b, box_a]).unwrap();
    assert_eq!(second.grid.faces[face].subset, box_b.region);
}
