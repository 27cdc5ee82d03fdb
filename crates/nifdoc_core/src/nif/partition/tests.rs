use super::*;

fn single_bone_influences(bones: &[u16]) -> Vec<VertexInfluence> {
	bones.iter().map(|&bone| vec![(bone, 1.0)]).collect()
}

mod strips {
	use super::*;

	#[test]
	fn strip_of_n_yields_n_minus_two_triangles() {
		let triangles = strips_to_triangles(&[vec![0, 1, 2, 3, 4]]);
		assert_eq!(triangles, vec![[0, 1, 2], [1, 3, 2], [2, 3, 4]]);
	}

	#[test]
	fn short_strips_yield_nothing() {
		assert!(strips_to_triangles(&[vec![], vec![0], vec![0, 1]]).is_empty());
		assert_eq!(strips_to_triangles(&[vec![0, 1], vec![4, 5, 6]]), vec![[4, 5, 6]]);
	}

	#[test]
	fn degenerate_stitches_keep_their_slot() {
		let triangles = strips_to_triangles(&[vec![0, 1, 2, 2, 3, 4]]);
		assert_eq!(triangles, vec![[0, 1, 2], [1, 2, 2], [2, 2, 3], [2, 4, 3]]);
	}

	#[test]
	fn parity_restarts_per_strip() {
		let triangles = strips_to_triangles(&[vec![0, 1, 2, 3], vec![10, 11, 12, 13]]);
		assert_eq!(triangles, vec![[0, 1, 2], [1, 3, 2], [10, 11, 12], [11, 13, 12]]);
	}
}

mod planning {
	use super::*;

	#[test]
	fn unbounded_ceiling_keeps_one_partition() {
		let triangles = vec![[0, 1, 2], [3, 4, 5]];
		let influences = single_bone_influences(&[0, 1, 2, 3, 4, 5]);
		let plan = plan_partitions(&triangles, &influences, None, None);
		assert_eq!(plan.count, 1);
		assert_eq!(plan.assignment, vec![0, 0]);
		assert!(plan.splits.is_empty());
	}

	#[test]
	fn exceeding_the_ceiling_starts_a_new_partition() {
		let triangles: Vec<Triangle> = (0..10).map(|t| [t * 3, t * 3 + 1, t * 3 + 2]).collect();
		let influences = single_bone_influences(&(0..30).collect::<Vec<u16>>());
		let plan = plan_partitions(&triangles, &influences, None, Some(18));
		assert_eq!(plan.assignment, vec![0, 0, 0, 0, 0, 0, 1, 1, 1, 1]);
		assert_eq!(plan.count, 2);
		assert_eq!(plan.splits, vec![(0, 1)]);
	}

	#[test]
	fn split_shifts_later_partitions() {
		let triangles = vec![[0, 1, 2], [3, 4, 5], [6, 7, 8]];
		let influences = single_bone_influences(&[0, 1, 2, 3, 4, 5, 6, 7, 8]);
		let plan = plan_partitions(&triangles, &influences, Some(&[0, 0, 1][..]), Some(3));
		assert_eq!(plan.assignment, vec![0, 1, 2]);
		assert_eq!(plan.count, 3);
	}

	#[test]
	fn mismatched_existing_assignment_is_ignored() {
		let triangles = vec![[0, 1, 2]];
		let influences = single_bone_influences(&[0, 0, 0]);
		let plan = plan_partitions(&triangles, &influences, Some(&[4, 4][..]), Some(80));
		assert_eq!(plan.assignment, vec![0]);
	}

	#[test]
	fn every_partition_respects_the_ceiling() {
		let triangles: Vec<Triangle> = (0..200_u16).map(|t| [t, (t + 1) % 200, (t + 7) % 200]).collect();
		let influences: Vec<VertexInfluence> = (0..200_u16).map(|v| vec![(v % 97, 0.6), ((v * 7) % 97, 0.4)]).collect();
		let plan = plan_partitions(&triangles, &influences, None, Some(18));
		let partitions = build_partitions(&triangles, &influences, &plan).expect("partitions build");
		assert!(partitions.len() > 1);
		for partition in &partitions {
			assert!(partition.bones.len() <= 18, "partition has {} bones", partition.bones.len());
		}
		let total: usize = partitions.iter().map(|partition| partition.true_triangles.len()).sum();
		assert_eq!(total, triangles.len());
	}
}

mod rebuild {
	use super::*;

	#[test]
	fn weights_are_normalized_and_zero_filled() {
		let triangles = vec![[0, 1, 2]];
		let influences = vec![vec![(5, 2.0), (9, 2.0)], vec![(9, 0.5)], vec![]];
		let plan = plan_partitions(&triangles, &influences, None, None);
		let partition = &build_partitions(&triangles, &influences, &plan).expect("partitions build")[0];
		assert_eq!(partition.bones, vec![5, 9]);
		assert_eq!(partition.vertex_map, vec![0, 1, 2]);
		assert_eq!(partition.num_weights_per_vertex, 4);
		assert_eq!(&partition.vertex_weights[0..4], &[0.5, 0.5, 0.0, 0.0]);
		assert_eq!(&partition.bone_indices[0..4], &[0, 1, 0, 0]);
		assert_eq!(&partition.vertex_weights[4..8], &[1.0, 0.0, 0.0, 0.0]);
		assert_eq!(&partition.bone_indices[4..8], &[1, 0, 0, 0]);
		assert_eq!(&partition.vertex_weights[8..12], &[0.0; 4]);
	}

	#[test]
	fn nonzero_weight_sums_are_one() {
		let triangles = vec![[0, 1, 2], [2, 1, 3]];
		let influences = vec![vec![(0, 0.3), (1, 0.3), (2, 0.3)], vec![(1, 0.7)], vec![(2, 0.01), (3, 0.02)], vec![(0, 3.0), (4, 1.0)]];
		let plan = plan_partitions(&triangles, &influences, None, Some(80));
		for partition in build_partitions(&triangles, &influences, &plan).expect("partitions build") {
			for weights in partition.vertex_weights.chunks(4) {
				let sum: f32 = weights.iter().sum();
				assert!((sum - 1.0).abs() < 1e-5, "weights {weights:?}");
			}
		}
	}

	#[test]
	fn unbounded_partition_past_the_bone_slots_is_rejected() {
		let triangles: Vec<Triangle> = (0..100_u16).map(|t| [t * 3, t * 3 + 1, t * 3 + 2]).collect();
		let influences = single_bone_influences(&(0..300).collect::<Vec<u16>>());
		let plan = plan_partitions(&triangles, &influences, None, None);
		assert_eq!(plan.count, 1);
		let err = build_partitions(&triangles, &influences, &plan).expect_err("too many bones for one partition");
		assert!(matches!(err, NifError::TooManyPartitionBones { bones: 257, max: MAX_PARTITION_BONES }));
	}

	#[test]
	fn vertex_map_follows_first_appearance() {
		let triangles = vec![[7, 3, 5], [5, 3, 9]];
		let influences = single_bone_influences(&[0; 10]);
		let plan = plan_partitions(&triangles, &influences, None, None);
		let partition = &build_partitions(&triangles, &influences, &plan).expect("partitions build")[0];
		assert_eq!(partition.vertex_map, vec![7, 3, 5, 9]);
		assert_eq!(partition.triangles, vec![[0, 1, 2], [2, 1, 3]]);
		assert_eq!(partition.true_triangles, triangles);
	}
}

mod remapping {
	use super::*;

	#[test]
	fn local_mapping_drops_triangles_outside_the_map() {
		let (mapped, deleted) = map_to_local(&[[10, 11, 12], [10, 11, 99], [12, 11, 10]], &[10, 11, 12]);
		assert_eq!(mapped, vec![[0, 1, 2], [2, 1, 0]]);
		assert_eq!(deleted, vec![1]);
	}

	#[test]
	fn global_mapping_drops_out_of_range_locals() {
		let (global, deleted) = map_to_global(&[[0, 1, 2], [0, 3, 1]], &[10, 11, 12]);
		assert_eq!(global, vec![[10, 11, 12]]);
		assert_eq!(deleted, vec![1]);
	}

	#[test]
	fn partition_regenerates_either_triangle_form() {
		let mut partition = SkinPartition {
			vertex_map: vec![4, 8, 6, 2],
			strips: vec![vec![0, 1, 2, 3]],
			strip_lengths: vec![4],
			..SkinPartition::default()
		};
		assert!(partition.regenerate_true_triangles().is_empty());
		assert_eq!(partition.true_triangles, vec![[4, 8, 6], [8, 2, 6]]);

		assert!(partition.regenerate_mapped_triangles().is_empty());
		assert_eq!(partition.triangles, vec![[0, 1, 2], [1, 3, 2]]);
		assert!(partition.strips.is_empty());
		assert_eq!(partition.num_triangles, 2);
	}
}
