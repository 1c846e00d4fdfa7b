mod workflow_version_test;
