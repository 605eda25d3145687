pub mod site_fixture;
