use ndt_codec::{decode, encode, load, save, CodecError, DynTensor, WireElement};
use ndt_tensor::{DType, Tensor, TensorError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_dims(rng: &mut StdRng) -> Vec<usize> {
    let rank = rng.gen_range(1..=4);
    (0..rank).map(|_| rng.gen_range(1..=5)).collect()
}

fn assert_round_trip<T: WireElement>(tensor: &Tensor<T>) {
    let bytes = encode(tensor).unwrap();
    let value = decode(&bytes).unwrap();
    assert_eq!(value.dtype(), T::DTYPE);
    let back = value.into_tensor::<T>().unwrap();
    assert_eq!(&back, tensor);
    assert!(!back.is_view());
}

#[test]
fn round_trip_every_element_kind() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let dims = random_dims(&mut rng);
        assert_round_trip(&Tensor::from_fn(&dims, |_| rng.gen::<bool>()).unwrap());
        assert_round_trip(&Tensor::from_fn(&dims, |_| rng.gen::<i8>()).unwrap());
        assert_round_trip(&Tensor::from_fn(&dims, |_| rng.gen::<i16>()).unwrap());
        assert_round_trip(&Tensor::from_fn(&dims, |_| rng.gen::<i32>()).unwrap());
        assert_round_trip(&Tensor::from_fn(&dims, |_| rng.gen::<f32>()).unwrap());
        assert_round_trip(&Tensor::from_fn(&dims, |_| rng.gen::<i64>()).unwrap());
        assert_round_trip(&Tensor::from_fn(&dims, |_| rng.gen::<f64>()).unwrap());
    }
}

#[test]
fn round_trip_bool_sizes_not_multiple_of_eight() {
    for n in [1, 3, 7, 8, 9, 15, 17, 63] {
        let t = Tensor::from_fn(&[n], |i| i[0] % 3 == 0).unwrap();
        let bytes = encode(&t).unwrap();
        assert_eq!(bytes.len(), 5 + 8 + n.div_ceil(8));
        assert_round_trip(&t);
    }
}

#[test]
fn round_trip_float_specials() {
    let t = Tensor::from_vec(
        &[5],
        vec![f64::INFINITY, f64::NEG_INFINITY, -0.0, f64::MIN_POSITIVE, f64::MAX],
    )
    .unwrap();
    assert_round_trip(&t);

    let nan = Tensor::from_vec(&[1], vec![f32::NAN]).unwrap();
    let back = decode(&encode(&nan).unwrap()).unwrap().into_tensor::<f32>().unwrap();
    assert!(back.get(&[0]).unwrap().is_nan());
}

#[test]
fn views_decode_to_compact_copies() {
    let t = Tensor::from_fn(&[3, 4], |i| (i[0] * 4 + i[1]) as i16).unwrap();
    let view = t.slice(&[1..3, 0..4]).unwrap().reverse(1).unwrap();
    let back = decode(&encode(&view).unwrap())
        .unwrap()
        .into_tensor::<i16>()
        .unwrap();
    assert_eq!(back.to_vec(), vec![7, 6, 5, 4, 11, 10, 9, 8]);
    assert!(!back.shares_storage_with(&t));
}

#[test]
fn wrong_kind_is_invalid_type() {
    let value = decode(&encode(&Tensor::<i64>::ones(&[2]).unwrap()).unwrap()).unwrap();
    match value.into_tensor::<i32>() {
        Err(CodecError::Tensor(TensorError::InvalidType { expected, got })) => {
            assert_eq!(expected, DType::I32);
            assert_eq!(got, DType::I64);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn unknown_tag_is_rejected() {
    let mut bytes = encode(&Tensor::<i32>::ones(&[1]).unwrap()).unwrap();
    bytes[0] = 0;
    assert!(matches!(decode(&bytes).unwrap_err(), CodecError::UnknownDType(0)));
}

#[test]
fn compute_save_load_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.ndt");

    let scores = Tensor::from_rows(vec![vec![5, 6, 1], vec![-1, 0, 2]]).unwrap();
    let best = scores.argmax(1, false).unwrap();
    save(&path, &best).unwrap();

    let loaded = load(&path).unwrap();
    assert!(matches!(loaded, DynTensor::I32(_)));
    assert_eq!(loaded.into_tensor::<i32>().unwrap().to_vec(), vec![1, 2]);
}
