//! The built-in conversion manifest for the TensorFlow Lite Micro examples.

use crate::extractor::ExtractMode;
use crate::pack::PackFormat;
use crate::utils::ConversionJob;

/// Default source root, relative to the repository root.
pub const DEFAULT_SOURCE_ROOT: &str = "submodules/tensorflow/tensorflow/lite/micro";

/// Default output directory, relative to the repository root.
pub const DEFAULT_OUTPUT_DIR: &str = "examples/models";

const PERSON_MODEL_DIR: &str = "tools/make/downloads/person_model_grayscale";

/// Every model and sample payload the example programs embed, in run order.
pub fn builtin_jobs() -> Vec<ConversionJob> {
    use ExtractMode::{Decimal, Float, Hex};

    vec![
        // hello_world
        ConversionJob::new("hello_world.tflite", "examples/hello_world/model.cc", Hex),
        // magic_wand
        ConversionJob::new(
            "magic_wand.tflite",
            "examples/magic_wand/magic_wand_model_data.cc",
            Hex,
        ),
        ConversionJob::new(
            "ring_micro_f9643d42_nohash_4.data",
            "examples/magic_wand/ring_micro_features_data.cc",
            Float,
        ),
        ConversionJob::new(
            "slope_micro_f2e59fea_nohash_1.data",
            "examples/magic_wand/slope_micro_features_data.cc",
            Float,
        ),
        // micro_speech
        ConversionJob::new(
            "micro_speech.tflite",
            "examples/micro_speech/micro_features/model.cc",
            Hex,
        ),
        ConversionJob::new(
            "no_micro_f9643d42_nohash_4.data",
            "examples/micro_speech/micro_features/no_micro_features_data.cc",
            Decimal,
        ),
        ConversionJob::new(
            "yes_micro_f2e59fea_nohash_1.data",
            "examples/micro_speech/micro_features/yes_micro_features_data.cc",
            Decimal,
        ),
        // micro_speech audio, 16-bit PCM
        ConversionJob::new(
            "yes_1000ms_sample.data",
            "examples/micro_speech/yes_1000ms_sample_data.cc",
            Decimal,
        )
        .with_format(PackFormat::LITTLE_ENDIAN_I16),
        ConversionJob::new(
            "no_1000ms_sample.data",
            "examples/micro_speech/no_1000ms_sample_data.cc",
            Decimal,
        )
        .with_format(PackFormat::LITTLE_ENDIAN_I16),
        // person_detection, grayscale
        ConversionJob::new(
            "person_detection_grayscale.tflite",
            &format!("{PERSON_MODEL_DIR}/person_detect_model_data.cc"),
            Hex,
        ),
        ConversionJob::new(
            "person_image_data_grayscale.data",
            &format!("{PERSON_MODEL_DIR}/person_image_data.cc"),
            Hex,
        ),
        ConversionJob::new(
            "no_person_image_data_grayscale.data",
            &format!("{PERSON_MODEL_DIR}/no_person_image_data.cc"),
            Hex,
        ),
    ]
}
