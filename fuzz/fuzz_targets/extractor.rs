#![no_main]

use libfuzzer_sys::fuzz_target;

use ecoscore::extractor::extract;
use ecoscore::oracle::parse_judgment;
use ecoscore::scoring::score;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    // Neither stage may panic on arbitrary input.
    let product = extract(&text);
    let _ = product.summary();

    if let Ok(judgment) = parse_judgment(&text)
        && let Ok(value) = score(&judgment)
    {
        assert!(value <= 100);
    }
});
