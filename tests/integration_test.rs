// Integration tests for knnrec
use knnrec_core::{
    classify, cosine_similarity, find_k_neighbors, recommend, Category, Error, RatingMatrix,
    RatingVector,
};
use knnrec_storage::{load_ratings_csv, DatasetManager};
use std::io::Write;

/// Deterministic pseudo-random matrix, roughly 40% dense
fn synthetic_matrix(users: usize, items: usize) -> RatingMatrix {
    let labels = (0..items).map(|i| format!("track_{}", i)).collect();
    let rows = (0..users)
        .map(|u| {
            (0..items)
                .map(|i| {
                    let h = (u * 31 + i * 17 + u * i) % 10;
                    if h < 4 { (h + 2) as f64 } else { 0.0 }
                })
                .collect()
        })
        .collect();
    RatingMatrix::new(labels, rows).unwrap()
}

#[test]
fn test_similarity_properties() {
    let m = synthetic_matrix(30, 25);
    for a in m.rows() {
        for b in m.rows() {
            assert_eq!(cosine_similarity(a, b), cosine_similarity(b, a));
            let s = cosine_similarity(a, b);
            assert!((0.0..=1.0 + 1e-12).contains(&s));
        }
        if a.iter().any(|&v| v != 0.0) {
            assert!((cosine_similarity(a, a) - 1.0).abs() < 1e-12);
        }
    }
}

#[test]
fn test_neighbor_search_over_dataset() {
    let m = synthetic_matrix(50, 40);
    let candidate = RatingVector::from_slice(m.row(17));

    let neighbors = find_k_neighbors(&candidate, &m, 10).unwrap();
    assert_eq!(neighbors.len(), 10);
    assert!(neighbors.similarities().windows(2).all(|w| w[0] >= w[1]));
    assert!((neighbors.similarities()[0] - 1.0).abs() < 1e-12);

    assert!(neighbors.indices().contains(&17));

    let all = find_k_neighbors(&candidate, &m, 50).unwrap();
    assert_eq!(all.len(), 50);
    assert_eq!(&all.indices()[..10], neighbors.indices());
}

#[test]
fn test_zero_candidate_end_to_end() {
    let m = synthetic_matrix(20, 15);
    let candidate = RatingVector::new(vec![0.0; 15]);

    let neighbors = find_k_neighbors(&candidate, &m, 5).unwrap();
    assert_eq!(neighbors.indices(), &[0, 1, 2, 3, 4]);

    let result = classify(&candidate, &m, 5).unwrap();
    assert!(Category::ALL.contains(&result.category));
    assert_eq!(result.mean_similarity, 0.0);

    let recs = recommend(&candidate, &m, 5, 100).unwrap();
    assert_eq!(recs.len(), 15);
}

#[test]
fn test_recommend_invariants() {
    let m = synthetic_matrix(40, 30);
    let mut ratings = vec![0.0; 30];
    for i in (0..30).step_by(3) {
        ratings[i] = ((i % 5) + 1) as f64;
    }
    let candidate = RatingVector::new(ratings);

    for n in [1, 5, 20, 50] {
        let recs = recommend(&candidate, &m, 8, n).unwrap();
        assert_eq!(recs.len(), n.min(candidate.unrated_count()));
        for rec in &recs {
            assert_eq!(candidate.as_slice()[rec.item_index], 0.0);
            assert_eq!(rec.item, m.item_labels()[rec.item_index]);
            assert!(rec.voter_count <= 8);
            assert!((0.0..=5.0).contains(&rec.predicted_score));
        }
        assert!(recs.windows(2).all(|w| w[0].predicted_score >= w[1].predicted_score));
    }
}

#[test]
fn test_input_errors() {
    let m = synthetic_matrix(5, 4);
    let candidate = RatingVector::new(vec![1.0, 0.0, 0.0, 0.0]);

    assert!(matches!(classify(&candidate, &m, 0), Err(Error::InvalidK { .. })));
    assert!(matches!(recommend(&candidate, &m, 6, 3), Err(Error::InvalidK { .. })));

    let short = RatingVector::new(vec![1.0, 0.0]);
    assert!(matches!(
        recommend(&short, &m, 2, 3),
        Err(Error::DimensionMismatch { expected: 4, actual: 2 })
    ));
}

#[test]
fn test_csv_to_recommendation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "UserID,Bohemian Rhapsody,Imagine,Hey Jude,Wonderwall,Yesterday").unwrap();
    writeln!(file, "1,5,5,4,3,4").unwrap();
    writeln!(file, "2,4,4,5,2,3").unwrap();
    writeln!(file, "3,1,,2,5,").unwrap();
    writeln!(file, "4,bad,3,,4,1").unwrap();

    let matrix = load_ratings_csv(file.path()).unwrap();
    assert_eq!(matrix.n_users(), 4);
    assert_eq!(matrix.n_items(), 5);
    assert_eq!(matrix.item_labels()[0], "Bohemian Rhapsody");

    let manager = DatasetManager::new(matrix);
    manager.set_default_k(2).unwrap();
    let k = manager.resolve_k(None).unwrap();

    let candidate = RatingVector::new(vec![5.0, 4.0, 0.0, 0.0, 3.0]);
    let recs = recommend(&candidate, manager.matrix(), k, 10).unwrap();

    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].item, "Hey Jude");
    assert_eq!(recs[1].item, "Wonderwall");
    assert_eq!(recs[0].voter_count, 2);
    assert!((recs[0].mean_neighbor_rating - 4.5).abs() < 1e-12);
}

#[test]
fn test_classification_is_deterministic() {
    let m = synthetic_matrix(60, 20);
    let candidate = RatingVector::from_slice(m.row(3));
    let first = classify(&candidate, &m, 7).unwrap();
    for _ in 0..5 {
        assert_eq!(classify(&candidate, &m, 7).unwrap(), first);
    }
    let json = serde_json::to_value(&first).unwrap();
    assert_eq!(json["category"], first.category.label());
}
