use onestore_testkit::{SampleSpec, offsets, write_fixture};

use crate::cmd::test_support::{fixture_arg, run_onestore, run_onestore_json, run_onestore_json_failing};

#[test]
fn check_json_reports_clean_samples() {
	for spec in [SampleSpec::one(), SampleSpec::onetoc2()] {
		let path = write_fixture(&format!("cli-check/{}", spec.file_name), &spec.build());
		let json = run_onestore_json(&["check", &fixture_arg(&path), "--json"]);

		assert_eq!(json["clean"], true, "{}: {}", spec.file_name, json["violations"]);
		assert_eq!(json["violation_count"], 0);
		assert!(json["lists"].as_u64().is_some_and(|lists| lists >= 3));
	}
}

#[test]
fn check_json_lists_violations_and_exits_nonzero() {
	let mut bytes = SampleSpec::one().build();
	bytes[offsets::FFV_LAST_CODE_THAT_WROTE] = 0x1B;
	bytes[offsets::RGB_RESERVED] = 1;
	let path = write_fixture("cli-check/violations/Sample.one", &bytes);
	let json = run_onestore_json_failing(&["check", &fixture_arg(&path), "--json"]);

	assert_eq!(json["clean"], false);
	assert_eq!(json["violation_count"], 2);
	assert_eq!(json["violations"][0]["rule"], "header-code-version");
	assert_eq!(json["violations"][1]["rule"], "header-reserved");
}

#[test]
fn check_fail_fast_reports_first_violation() {
	let mut bytes = SampleSpec::one().build();
	bytes[offsets::FFV_LAST_CODE_THAT_WROTE] = 0x1B;
	bytes[offsets::RGB_RESERVED] = 1;
	let path = write_fixture("cli-check/fail-fast/Sample.one", &bytes);
	let output = run_onestore(&["check", &fixture_arg(&path), "--fail-fast"]);

	assert_eq!(output.status.code(), Some(1));
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("ffvLastCodeThatWroteToThisFile"), "stderr: {stderr}");
}

#[test]
fn check_name_crc_can_be_skipped() {
	let path = write_fixture("cli-check/renamed.onetoc2", &SampleSpec::onetoc2().build());

	let json = run_onestore_json_failing(&["check", &fixture_arg(&path), "--json"]);
	assert_eq!(json["violations"][0]["rule"], "header-name-crc");

	let json = run_onestore_json(&["check", &fixture_arg(&path), "--json", "--no-name-crc"]);
	assert_eq!(json["clean"], true);
}
