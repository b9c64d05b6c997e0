mod samples_file {

	use onestore_testkit::{SampleSpec, offsets, write_fixture};

	use crate::store::{DecodeOptions, FileMeta, FileProfile, FormatError, OneStoreFile, Rule, decode};

	#[test]
	fn open_derives_name_from_path() {
		let spec = SampleSpec::onetoc2();
		let path = write_fixture("Open Notebook.onetoc2", &spec.build());

		let file = OneStoreFile::open(&path).expect("fixture opens");
		assert_eq!(file.meta().file_name.as_deref(), Some("Open Notebook.onetoc2"));
		assert_eq!(file.header().expect("header parses").c_transactions_in_log, 2);

		let report = file.decode(&DecodeOptions::default()).expect("decodes");
		assert_eq!(report.profile, FileProfile::OneToc2);
		assert!(report.is_clean(), "unexpected violations: {:?}", report.diagnostics.items());
	}

	#[test]
	fn renamed_file_fails_name_crc() {
		let path = write_fixture("file-tests-renamed.one", &SampleSpec::one().build());
		let report = OneStoreFile::open(&path).expect("fixture opens").decode(&DecodeOptions::default()).expect("decodes");
		assert!(report.diagnostics.has(Rule::HeaderNameCrc));
	}

	#[test]
	fn short_file_is_rejected_on_open() {
		let path = write_fixture("file-tests-short.one", &[0; 512]);
		let err = OneStoreFile::open(&path).err().expect("short file fails");
		assert!(matches!(err, FormatError::UnexpectedEof { need: 1024, rem: 512, .. }));
	}

	#[test]
	fn missing_file_is_io_error() {
		let err = OneStoreFile::open("/nonexistent/onestore/missing.one").err().expect("missing file fails");
		assert!(matches!(err, FormatError::Io(_)));
	}

	#[test]
	fn unknown_file_type_stops_decoding() {
		let mut bytes = SampleSpec::one().build();
		bytes[offsets::GUID_FILE_TYPE + 15] ^= 0x80;
		let err = decode(&bytes, &FileMeta::default(), &DecodeOptions::default()).expect_err("unknown type is fatal");
		assert!(matches!(err, FormatError::UnknownFileType { .. }));
	}

	#[test]
	fn fail_fast_returns_first_violation() {
		let mut bytes = SampleSpec::one().build();
		bytes[offsets::FFV_LAST_CODE_THAT_WROTE] = 0x1B;
		bytes[offsets::GRF_DEBUG_LOG_FLAGS] = 1;

		let report = decode(&bytes, &FileMeta::named("Sample.one"), &DecodeOptions::default()).expect("decodes");
		assert_eq!(report.diagnostics.len(), 2);
		let err = report.into_result().expect_err("violations fail fast");
		assert!(matches!(err, FormatError::VersionMismatch { found: 0x1B, .. }));
	}

	#[test]
	fn collect_all_keeps_decoding_after_header_violations() {
		let mut bytes = SampleSpec::one().build();
		bytes[offsets::RGB_RESERVED] = 1;
		let report = decode(&bytes, &FileMeta::default(), &DecodeOptions::default()).expect("decodes");
		assert_eq!(report.diagnostics.len(), 1);
		assert_eq!(report.graph.object_spaces.len(), 1);
		assert!(report.graph.file_data_store.is_some());
	}
}
