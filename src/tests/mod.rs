mod spend_tests;
