use onestore_testkit::{SampleSpec, write_fixture};

use crate::cmd::test_support::{fixture_arg, run_onestore, run_onestore_json};

#[test]
fn nodes_json_lists_root_nodes_in_order() {
	let path = write_fixture("cli-nodes/Sample.one", &SampleSpec::one().build());
	let json = run_onestore_json(&["nodes", &fixture_arg(&path), "--json"]);

	assert_eq!(json["profile"], "one");
	assert_eq!(json["total"], 3);
	let names: Vec<_> = json["nodes"]
		.as_array()
		.expect("nodes array")
		.iter()
		.map(|node| node["name"].as_str().unwrap_or_default().to_owned())
		.collect();
	assert_eq!(
		names,
		vec!["ObjectSpaceManifestRootFND", "ObjectSpaceManifestListReferenceFND", "FileDataStoreListReferenceFND"]
	);
	assert!(json["nodes"][0]["reference"].is_null());
	assert!(json["nodes"][1]["reference"].as_str().is_some_and(|item| item.starts_with("0x")));
}

#[test]
fn nodes_json_all_walks_every_list() {
	let path = write_fixture("cli-nodes/Open Notebook.onetoc2", &SampleSpec::onetoc2().build());
	let json = run_onestore_json(&["nodes", &fixture_arg(&path), "--list", "all", "--limit", "4", "--json"]);

	assert!(json["total"].as_u64().is_some_and(|total| total > 2));
	assert_eq!(json["nodes"].as_array().map(Vec::len), Some(4));
	let lists = json["lists"].as_array().expect("lists array");
	assert_eq!(lists.len(), 3);
	assert!(lists.iter().all(|list| list["complete"] == true));
}

#[test]
fn nodes_text_truncates_at_limit() {
	let path = write_fixture("cli-nodes/limit.onetoc2", &SampleSpec::onetoc2().build());
	let output = run_onestore(&["nodes", &fixture_arg(&path), "--list", "all", "--limit", "1"]);
	assert!(output.status.success());

	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("more"));
}
