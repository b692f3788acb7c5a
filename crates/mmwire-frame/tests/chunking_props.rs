//! Property tests: decoding must not depend on how the stream is chunked.

use bytes::BytesMut;
use mmwire_frame::{encode_frame, Channel, Frame, FrameDecoder, FrameError};
use proptest::prelude::*;

fn frame_strategy() -> impl Strategy<Value = Frame> {
    (any::<u8>(), prop::collection::vec(any::<u8>(), 0..64))
        .prop_map(|(tag, payload)| Frame::new(Channel(tag), payload))
}

fn encode_all(frames: &[Frame]) -> Vec<u8> {
    let mut wire = BytesMut::new();
    for frame in frames {
        encode_frame(frame.channel, &frame.payload, &mut wire).expect("payload fits");
    }
    wire.to_vec()
}

/// Feed `wire` split at the given cut points; the last chunk is final.
fn decode_chunked(wire: &[u8], cuts: &[usize]) -> Result<Vec<(Frame, bool)>, FrameError> {
    let mut bounds: Vec<usize> = cuts.iter().map(|cut| cut % (wire.len() + 1)).collect();
    bounds.push(0);
    bounds.push(wire.len());
    bounds.sort_unstable();
    bounds.dedup();

    let mut decoder = FrameDecoder::new();
    let mut out = Vec::new();
    let mut sink = |frame: Frame, is_final: bool| out.push((frame, is_final));
    for pair in bounds.windows(2) {
        decoder.feed(&wire[pair[0]..pair[1]], false, &mut sink)?;
    }
    decoder.finish(&mut sink)?;
    Ok(out)
}

proptest! {
    #[test]
    fn any_chunking_yields_the_same_frames(
        frames in prop::collection::vec(frame_strategy(), 0..12),
        cuts in prop::collection::vec(any::<usize>(), 0..16),
    ) {
        let wire = encode_all(&frames);
        let decoded = decode_chunked(&wire, &cuts).expect("valid stream decodes");
        let decoded: Vec<Frame> = decoded.into_iter().map(|(frame, _)| frame).collect();
        prop_assert_eq!(decoded, frames);
    }

    #[test]
    fn one_byte_per_call_matches_single_call(
        frames in prop::collection::vec(frame_strategy(), 1..6),
    ) {
        let wire = encode_all(&frames);

        let mut decoder = FrameDecoder::new();
        let mut bytewise = Vec::new();
        for byte in &wire {
            bytewise.extend(decoder.push(std::slice::from_ref(byte)).expect("decodes"));
        }
        decoder.finish(&mut |_: Frame, _: bool| {}).expect("no trailing data");

        let whole = FrameDecoder::decode_all(&wire).expect("decodes");
        prop_assert_eq!(&bytewise, &whole);
        prop_assert_eq!(whole, frames);
    }

    #[test]
    fn concatenated_streams_decode_to_concatenated_frames(
        left in prop::collection::vec(frame_strategy(), 0..6),
        right in prop::collection::vec(frame_strategy(), 0..6),
    ) {
        let mut wire = encode_all(&left);
        wire.extend(encode_all(&right));

        let decoded = FrameDecoder::decode_all(&wire).expect("decodes");
        let expected: Vec<Frame> = left.into_iter().chain(right).collect();
        prop_assert_eq!(decoded, expected);
    }

    #[test]
    fn truncated_streams_never_emit_partial_frames(
        frames in prop::collection::vec(frame_strategy(), 1..6),
        cut in any::<usize>(),
    ) {
        let wire = encode_all(&frames);
        let cut = cut % wire.len();
        let complete: usize = {
            let mut offset = 0;
            let mut count = 0;
            for frame in &frames {
                offset += frame.wire_size();
                if offset > cut {
                    break;
                }
                count += 1;
            }
            count
        };

        let mut decoder = FrameDecoder::new();
        let mut out = Vec::new();
        let result = decoder.feed(&wire[..cut], true, &mut |frame: Frame, _: bool| out.push(frame));

        prop_assert_eq!(&out[..], &frames[..complete]);
        let boundary = frames.iter().take(complete).map(Frame::wire_size).sum::<usize>() == cut;
        if boundary {
            prop_assert!(result.is_ok());
        } else {
            let is_truncated = matches!(result, Err(FrameError::Truncated { .. }));
            prop_assert!(is_truncated);
        }
    }

    #[test]
    fn final_flag_only_on_last_call(
        frames in prop::collection::vec(frame_strategy(), 1..6),
    ) {
        let wire = encode_all(&frames);
        let last_len = frames.last().map(Frame::wire_size).unwrap_or(0);
        let split = wire.len() - last_len;

        let mut decoder = FrameDecoder::new();
        let mut out = Vec::new();
        let mut sink = |frame: Frame, is_final: bool| out.push((frame, is_final));
        decoder.feed(&wire[..split], false, &mut sink).expect("decodes");
        decoder.feed(&wire[split..], true, &mut sink).expect("decodes");

        let flags: Vec<bool> = out.iter().map(|(_, is_final)| *is_final).collect();
        let mut expected = vec![false; frames.len() - 1];
        expected.push(true);
        prop_assert_eq!(flags, expected);
    }
}

#[test]
fn fixed_byte_vectors() {
    let frames = FrameDecoder::decode_all(b"N00000002hiE00000003bye").unwrap();
    assert_eq!(
        frames,
        vec![Frame::new(b'N', "hi"), Frame::new(b'E', "bye")]
    );

    let frames = FrameDecoder::decode_all(b"N00000000").unwrap();
    assert_eq!(frames, vec![Frame::new(b'N', "")]);
}
