mod battle_flow_tests;
