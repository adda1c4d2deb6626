use findash::model::tick::Tick;
use findash::tick_buffer::TickBuffer;

#[test]
fn last_tracks_newest_tick_per_token() {
    let mut buf = TickBuffer::new(10);
    buf.push(Tick::new(408065, 1_000, 1500.0));
    buf.push(Tick::new(408065, 2_000, 1501.5));
    buf.push(Tick::new(738561, 1_500, 2800.0));

    assert!((buf.last(408065).unwrap().last_price - 1501.5).abs() < f64::EPSILON);
    assert!((buf.last(738561).unwrap().last_price - 2800.0).abs() < f64::EPSILON);
    assert!(buf.last(1).is_none());
}

#[test]
fn clear_resets_series_and_counter() {
    let mut buf = TickBuffer::new(3);
    buf.extend((0..5).map(|i| Tick::new(7, i * 1_000, 10.0 + i as f64)));
    assert_eq!(buf.series(7).unwrap().len(), 3);
    assert_eq!(buf.received(), 5);

    buf.clear();
    assert!(buf.is_empty());
    assert_eq!(buf.received(), 0);
    assert_eq!(buf.capacity(), 3);
}
