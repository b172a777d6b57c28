use super::*;

fn frame() -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    }
}

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 2,
        height: 2,
        tick_rate: TickRate::default(),
    }
}

#[test]
fn in_memory_sink_collects_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(TickIndex(1), &frame()).unwrap();
    sink.push_frame(TickIndex(2), &frame()).unwrap();
    sink.end().unwrap();
    assert_eq!(sink.frames().len(), 2);
    assert!(sink.is_ended());
    assert_eq!(sink.config().unwrap().tick_rate.per_second, 60);
}

#[test]
fn in_memory_sink_rejects_out_of_order_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(TickIndex(5), &frame()).unwrap();
    assert!(sink.push_frame(TickIndex(5), &frame()).is_err());
}

#[test]
fn ffmpeg_sink_requires_begin() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: PathBuf::from("target/never.mp4"),
        overwrite: true,
        background: Rgba8::BLACK,
    });
    assert!(sink.push_frame(TickIndex(1), &frame()).is_err());
    assert!(sink.end().is_err());
}
